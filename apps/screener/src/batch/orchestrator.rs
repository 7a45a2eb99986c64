//! Batch Orchestrator — screens a folder of resumes against one job description.
//!
//! Flow: load JD → (dump JD text) → for each resume, in order:
//!       extract → classify → copy into `fit/` or `unfit/` → pause.
//!
//! Per-document failures never escape a document: unreadable text becomes empty
//! text, a panic anywhere else in screening becomes `Unfit`. Only a JD that cannot be loaded
//! aborts the run, before any resume is touched.

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::batch::routing::{save_text_to_file, OutputRouter};
use crate::classification::{Classification, ResumeClassifier};
use crate::errors::BatchFatalError;
use crate::extraction::TextSource;
use crate::models::screening::{
    BatchResult, ClassifierTier, DocumentHandle, JobDescription, ResumeDocument, Verdict,
};

/// Pause between consecutive documents.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

pub struct BatchOrchestrator {
    source: Arc<dyn TextSource>,
    classifier: ResumeClassifier,
    router: OutputRouter,
    delay: Duration,
    job_description_dump: Option<PathBuf>,
}

impl BatchOrchestrator {
    pub fn new(source: Arc<dyn TextSource>, classifier: ResumeClassifier, router: OutputRouter) -> Self {
        Self {
            source,
            classifier,
            router,
            delay: DEFAULT_DELAY,
            job_description_dump: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Save the extracted job description text to `path` before screening starts.
    pub fn with_job_description_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.job_description_dump = Some(path.into());
        self
    }

    /// Screens `resumes` sequentially. Every input appears exactly once in the
    /// result, in input order within its bucket.
    pub async fn run(
        &self,
        job_description: &DocumentHandle,
        resumes: &[PathBuf],
    ) -> Result<BatchResult, BatchFatalError> {
        let job_description = self.load_job_description(job_description).await?;
        let mut result = BatchResult::new(job_description.handle().clone());
        let total = resumes.len();

        info!(
            "Screening {total} resumes against {} ({})",
            job_description.handle(),
            if self.classifier.has_primary() {
                "model with TF-IDF fallback"
            } else {
                "TF-IDF only"
            }
        );

        for (index, path) in resumes.iter().enumerate() {
            info!("Processing resume {}/{}: {}", index + 1, total, path.display());
            let document = self.screen_isolated(path, &job_description).await;
            info!(
                "{} -> {} ({:?}, {} chars of text)",
                path.display(),
                document.verdict,
                document.tier,
                document.text.chars().count()
            );
            result.record(document);

            if index + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let result = result.finish();
        info!(
            "Classification completed. Results: {} fit, {} unfit of {}",
            result.fit.len(),
            result.unfit.len(),
            result.total()
        );
        Ok(result)
    }

    async fn load_job_description(
        &self,
        handle: &DocumentHandle,
    ) -> Result<JobDescription, BatchFatalError> {
        info!("Loading job description from {handle}");
        let text = self.source.extract_text(handle).await.map_err(|source| {
            error!("Job description unavailable, aborting batch: {source}");
            BatchFatalError::JobDescription {
                handle: handle.clone(),
                source,
            }
        })?;
        info!("Job description loaded ({} chars)", text.chars().count());

        if let Some(path) = &self.job_description_dump {
            match save_text_to_file(&text, path).await {
                Ok(()) => info!("Job description text saved to {}", path.display()),
                Err(e) => warn!(
                    "Could not save job description text to {}: {e}",
                    path.display()
                ),
            }
        }

        Ok(JobDescription::new(handle.clone(), text))
    }

    /// Any panic while screening defaults the document to `Unfit`.
    async fn screen_isolated(&self, path: &Path, job_description: &JobDescription) -> ResumeDocument {
        match AssertUnwindSafe(self.screen(path, job_description))
            .catch_unwind()
            .await
        {
            Ok(document) => document,
            Err(_) => {
                error!(
                    "Unexpected failure while screening {}, defaulting to unfit",
                    path.display()
                );
                let copied_to = self.place_or_log(path, Verdict::Unfit).await;
                ResumeDocument {
                    path: path.to_path_buf(),
                    text: String::new(),
                    verdict: Verdict::Unfit,
                    tier: ClassifierTier::Defaulted,
                    similarity: None,
                    copied_to,
                    extraction_error: None,
                }
            }
        }
    }

    async fn screen(&self, path: &Path, job_description: &JobDescription) -> ResumeDocument {
        let handle = DocumentHandle::from(path);
        let (text, extraction_error) = match self.source.extract_text(&handle).await {
            Ok(text) => (text, None),
            Err(e) => {
                warn!("No text extracted from {}: {e}", path.display());
                (String::new(), Some(e.to_string()))
            }
        };

        let classification = self
            .classifier
            .classify(&text, job_description.text())
            .await;
        let (classification, copied_to) = self.route(path, classification).await;

        ResumeDocument {
            path: path.to_path_buf(),
            text,
            verdict: classification.verdict,
            tier: classification.tier,
            similarity: classification.similarity,
            copied_to,
            extraction_error,
        }
    }

    /// A resume that cannot be placed in `fit/` is demoted and placed in `unfit/`.
    async fn route(
        &self,
        path: &Path,
        classification: Classification,
    ) -> (Classification, Option<PathBuf>) {
        match self.router.place(path, classification.verdict).await {
            Ok(destination) => {
                info!("Copied to {}", destination.display());
                (classification, Some(destination))
            }
            Err(e) if classification.verdict == Verdict::Fit => {
                error!("{e}; defaulting to unfit");
                let demoted = Classification {
                    verdict: Verdict::Unfit,
                    tier: ClassifierTier::Defaulted,
                    similarity: classification.similarity,
                };
                (demoted, self.place_or_log(path, Verdict::Unfit).await)
            }
            Err(e) => {
                error!("{e}");
                (classification, None)
            }
        }
    }

    async fn place_or_log(&self, path: &Path, verdict: Verdict) -> Option<PathBuf> {
        match self.router.place(path, verdict).await {
            Ok(destination) => Some(destination),
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}
