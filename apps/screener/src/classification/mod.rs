//! Classification — turns (resume text, job description text) into a `Verdict`.
//!
//! Two tiers, tried in order:
//! 1. a `PrimaryClassifier` (default: `ModelClassifier`, a pretrained model behind HTTP)
//! 2. `SimilarityFallback` (TF-IDF cosine similarity, pure and offline)
//!
//! `ResumeClassifier` composes them and never fails.

use async_trait::async_trait;

use crate::inference_client::InferenceError;
use crate::models::screening::Verdict;

pub mod classifier;
pub mod model;
pub mod prompts;
pub mod similarity;
mod stop_words;

pub use classifier::{Classification, ResumeClassifier};
pub use model::ModelClassifier;
pub use similarity::SimilarityFallback;

/// The semantic tier. Implement this to swap the backend without touching
/// the fallback chain or the batch loop.
///
/// The `Result` is the point: every caller has to decide what an
/// `InferenceError` means for it.
#[async_trait]
pub trait PrimaryClassifier: Send + Sync {
    async fn classify(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Verdict, InferenceError>;
}
