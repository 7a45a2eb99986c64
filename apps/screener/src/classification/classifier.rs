use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::classification::similarity::SimilarityFallback;
use crate::classification::PrimaryClassifier;
use crate::inference_client::InferenceError;
use crate::models::screening::{ClassifierTier, Verdict};

pub const DEFAULT_PRIMARY_TIMEOUT: Duration = Duration::from_secs(30);

/// A verdict plus the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub tier: ClassifierTier,
    /// Present when the fallback decided.
    pub similarity: Option<f64>,
}

/// Two-tier fallback chain: primary classifier first, TF-IDF similarity when the
/// primary is missing, fails, panics or exceeds its time budget.
///
/// Not a vote. The fallback is only consulted when the primary produced nothing,
/// and its answer is then final.
#[derive(Clone)]
pub struct ResumeClassifier {
    primary: Option<Arc<dyn PrimaryClassifier>>,
    fallback: SimilarityFallback,
    primary_timeout: Duration,
}

impl ResumeClassifier {
    pub fn new(primary: Arc<dyn PrimaryClassifier>, fallback: SimilarityFallback) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            primary_timeout: DEFAULT_PRIMARY_TIMEOUT,
        }
    }

    /// Every classification goes straight to the similarity fallback.
    pub fn fallback_only(fallback: SimilarityFallback) -> Self {
        Self {
            primary: None,
            fallback,
            primary_timeout: DEFAULT_PRIMARY_TIMEOUT,
        }
    }

    pub fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = timeout;
        self
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn classify(&self, resume_text: &str, job_description: &str) -> Classification {
        // A blank resume gives the model nothing to judge; the fallback scores it 0.
        let primary = self
            .primary
            .as_ref()
            .filter(|_| !resume_text.trim().is_empty());

        if primary.is_none() && self.primary.is_some() {
            debug!("Resume text is empty, skipping model inference");
        }

        if let Some(primary) = primary {
            match self
                .call_primary(primary.as_ref(), resume_text, job_description)
                .await
            {
                Ok(verdict) => {
                    return Classification {
                        verdict,
                        tier: ClassifierTier::Primary,
                        similarity: None,
                    }
                }
                Err(e) => warn!("Model inference failed, switching to TF-IDF fallback: {e}"),
            }
        }

        self.fallback.classify(resume_text, job_description)
    }

    async fn call_primary(
        &self,
        primary: &dyn PrimaryClassifier,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Verdict, InferenceError> {
        let call = AssertUnwindSafe(primary.classify(resume_text, job_description))
            .catch_unwind()
            .map(|outcome| outcome.unwrap_or(Err(InferenceError::Panicked)));

        tokio::time::timeout(self.primary_timeout, call)
            .await
            .unwrap_or_else(|_| Err(InferenceError::Timeout(self.primary_timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::similarity::DEFAULT_THRESHOLD;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BACKEND_JD: &str =
        "Seeking a senior backend engineer with distributed systems experience.";
    const PASTRY_RESUME: &str = "Pastry chef with five years of bakery experience.";

    struct AlwaysAffirmative;

    #[async_trait]
    impl PrimaryClassifier for AlwaysAffirmative {
        async fn classify(&self, _: &str, _: &str) -> Result<Verdict, InferenceError> {
            Ok(Verdict::Fit)
        }
    }

    #[derive(Default)]
    struct AlwaysFailing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrimaryClassifier for AlwaysFailing {
        async fn classify(&self, _: &str, _: &str) -> Result<Verdict, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(InferenceError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            })
        }
    }

    struct Hanging;

    #[async_trait]
    impl PrimaryClassifier for Hanging {
        async fn classify(&self, _: &str, _: &str) -> Result<Verdict, InferenceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Verdict::Fit)
        }
    }

    struct Panicking;

    #[async_trait]
    impl PrimaryClassifier for Panicking {
        async fn classify(&self, _: &str, _: &str) -> Result<Verdict, InferenceError> {
            panic!("model crashed");
        }
    }

    fn failing_chain() -> (Arc<AlwaysFailing>, ResumeClassifier) {
        let primary = Arc::new(AlwaysFailing::default());
        let chain = ResumeClassifier::new(primary.clone(), SimilarityFallback::default());
        (primary, chain)
    }

    #[tokio::test]
    async fn test_primary_verdict_takes_precedence() {
        let chain = ResumeClassifier::new(Arc::new(AlwaysAffirmative), SimilarityFallback::default());

        for resume in [PASTRY_RESUME, "completely unrelated text", "x"] {
            let outcome = chain.classify(resume, BACKEND_JD).await;
            assert_eq!(outcome.verdict, Verdict::Fit);
            assert_eq!(outcome.tier, ClassifierTier::Primary);
            assert_eq!(outcome.similarity, None);
        }
    }

    #[tokio::test]
    async fn test_blank_resume_skips_primary_and_is_unfit() {
        let chain = ResumeClassifier::new(Arc::new(AlwaysAffirmative), SimilarityFallback::default());
        for resume in ["", "  \n\t "] {
            let outcome = chain.classify(resume, BACKEND_JD).await;
            assert_eq!(outcome.verdict, Verdict::Unfit);
            assert_eq!(outcome.tier, ClassifierTier::Fallback);
            assert_eq!(outcome.similarity, Some(0.0));
        }

        let (primary, failing) = failing_chain();
        failing.classify("", BACKEND_JD).await;
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_primary_matches_fallback_exactly() {
        let (_, chain) = failing_chain();
        let samples = [
            (BACKEND_JD, BACKEND_JD),
            (PASTRY_RESUME, BACKEND_JD),
            ("", ""),
            ("rust kafka", "kafka rust postgres"),
            ("Rust engineer", ""),
        ];

        let fallback = SimilarityFallback::new(DEFAULT_THRESHOLD);
        for (resume, jd) in samples {
            let expected = fallback.classify(resume, jd);
            assert_eq!(chain.classify(resume, jd).await, expected, "{resume:?} vs {jd:?}");
        }
    }

    #[tokio::test]
    async fn test_panicking_primary_falls_back() {
        let chain = ResumeClassifier::new(Arc::new(Panicking), SimilarityFallback::default());
        let fallback = SimilarityFallback::new(DEFAULT_THRESHOLD);

        for (resume, jd) in [(BACKEND_JD, BACKEND_JD), (PASTRY_RESUME, BACKEND_JD)] {
            let outcome = chain.classify(resume, jd).await;
            assert_eq!(outcome, fallback.classify(resume, jd), "{resume:?} vs {jd:?}");
            assert_eq!(outcome.tier, ClassifierTier::Fallback);
        }
        assert_eq!(chain.classify(BACKEND_JD, BACKEND_JD).await.verdict, Verdict::Fit);
    }

    #[tokio::test]
    async fn test_primary_called_once_per_classification() {
        let (primary, chain) = failing_chain();
        chain.classify(PASTRY_RESUME, BACKEND_JD).await;
        chain.classify(BACKEND_JD, BACKEND_JD).await;
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_scenarios() {
        let (_, chain) = failing_chain();

        let identical = chain.classify(BACKEND_JD, BACKEND_JD).await;
        assert_eq!(identical.verdict, Verdict::Fit);
        assert_eq!(identical.tier, ClassifierTier::Fallback);
        assert!((identical.similarity.unwrap() - 1.0).abs() < 1e-9);

        let pastry = chain.classify(PASTRY_RESUME, BACKEND_JD).await;
        assert_eq!(pastry.verdict, Verdict::Unfit);
        assert!(pastry.similarity.unwrap() < 0.15);
    }

    #[tokio::test]
    async fn test_empty_texts_yield_unfit_via_fallback() {
        let (_, chain) = failing_chain();
        let outcome = chain.classify("", "").await;
        assert_eq!(outcome.verdict, Verdict::Unfit);
        assert_eq!(outcome.similarity, Some(0.0));
    }

    #[tokio::test]
    async fn test_fallback_only_chain_never_calls_a_primary() {
        let chain = ResumeClassifier::fallback_only(SimilarityFallback::new(0.2));
        assert!(!chain.has_primary());

        let outcome = chain.classify("rust kafka postgres", "rust kafka").await;
        assert_eq!(outcome.tier, ClassifierTier::Fallback);
        assert_eq!(outcome.verdict, Verdict::Fit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_primary_times_out_into_fallback() {
        let chain = ResumeClassifier::new(Arc::new(Hanging), SimilarityFallback::default())
            .with_primary_timeout(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let outcome = chain.classify(PASTRY_RESUME, BACKEND_JD).await;

        assert_eq!(outcome.tier, ClassifierTier::Fallback);
        assert_eq!(outcome.verdict, Verdict::Unfit);
        assert!(started.elapsed() < Duration::from_secs(3600));
    }
}
