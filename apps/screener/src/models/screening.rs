use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Binary screening outcome for one resume against one job description.
///
/// `Unfit` is the default: any document whose classification could not be
/// completed ends up here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Fit,
    #[default]
    Unfit,
}

impl Verdict {
    /// Lowercase label, also used as the output directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fit => "fit",
            Verdict::Unfit => "unfit",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stage of the classification chain produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierTier {
    /// Semantic model backend.
    Primary,
    /// TF-IDF cosine similarity.
    Fallback,
    /// Neither tier completed; the document was defaulted to `Unfit`.
    Defaulted,
}

/// Where a document's text comes from: a local file or a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentHandle {
    File(PathBuf),
    Url(String),
}

impl DocumentHandle {
    /// `http://` and `https://` inputs are URLs, everything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DocumentHandle::Url(trimmed.to_string())
        } else {
            DocumentHandle::File(PathBuf::from(trimmed))
        }
    }
}

impl From<&Path> for DocumentHandle {
    fn from(path: &Path) -> Self {
        DocumentHandle::File(path.to_path_buf())
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentHandle::File(path) => write!(f, "{}", path.display()),
            DocumentHandle::Url(url) => f.write_str(url),
        }
    }
}

/// Job description text, loaded once per batch and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct JobDescription {
    handle: DocumentHandle,
    text: String,
}

impl JobDescription {
    pub fn new(handle: DocumentHandle, text: String) -> Self {
        Self { handle, text }
    }

    pub fn handle(&self) -> &DocumentHandle {
        &self.handle
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A screened resume. Only built once its final verdict is known.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDocument {
    pub path: PathBuf,
    /// Extracted text, empty when extraction failed. Kept out of the report.
    #[serde(skip)]
    pub text: String,
    pub verdict: Verdict,
    pub tier: ClassifierTier,
    /// Cosine similarity, present when the fallback decided.
    pub similarity: Option<f64>,
    /// Destination of the copy, `None` when the copy failed.
    pub copied_to: Option<PathBuf>,
    pub extraction_error: Option<String>,
}

/// Outcome of one batch run: both buckets in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub job_description: DocumentHandle,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub fit: Vec<ResumeDocument>,
    pub unfit: Vec<ResumeDocument>,
}

impl BatchResult {
    pub fn new(job_description: DocumentHandle) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            job_description,
            started_at: Utc::now(),
            finished_at: None,
            fit: Vec::new(),
            unfit: Vec::new(),
        }
    }

    /// Appends a document to the bucket matching its verdict.
    pub fn record(&mut self, document: ResumeDocument) {
        match document.verdict {
            Verdict::Fit => self.fit.push(document),
            Verdict::Unfit => self.unfit.push(document),
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn total(&self) -> usize {
        self.fit.len() + self.unfit.len()
    }
}
