use async_trait::async_trait;
use tracing::{debug, info};

use crate::classification::prompts::build_screening_prompt;
use crate::classification::PrimaryClassifier;
use crate::inference_client::{InferenceClient, InferenceError, InferenceSettings, LabelScore};
use crate::models::screening::Verdict;

/// Labels (lowercased) that count as an affirmative answer from the backend.
const AFFIRMATIVE_LABELS: [&str; 5] = ["positive", "label_1", "fit", "yes", "entailment"];

/// Primary tier: a pretrained text-classification model reached through `InferenceClient`.
///
/// Built once per process by `initialize` and handed to `ResumeClassifier` as an
/// `Arc<dyn PrimaryClassifier>`.
pub struct ModelClassifier {
    client: InferenceClient,
}

impl ModelClassifier {
    /// Builds the backend handle. No request is sent until the first `classify`.
    pub fn initialize(settings: InferenceSettings) -> Result<Self, InferenceError> {
        let client = InferenceClient::new(settings)?;
        info!("Primary classifier initialized (model: {})", client.model());
        Ok(Self { client })
    }
}

#[async_trait]
impl PrimaryClassifier for ModelClassifier {
    async fn classify(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Verdict, InferenceError> {
        let prompt = build_screening_prompt(resume_text, job_description);
        let labels = self.client.classify(&prompt).await?;

        let verdict = top_label(&labels)
            .map(|l| verdict_from_label(&l.label))
            .unwrap_or_default();
        debug!("Model verdict: {verdict} (labels: {labels:?})");
        Ok(verdict)
    }
}

/// Highest-scoring label; NaN scores sort below everything else.
fn top_label(labels: &[LabelScore]) -> Option<&LabelScore> {
    labels
        .iter()
        .filter(|l| !l.score.is_nan())
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Affirmative labels map to `Fit`; anything else, including labels we do not
/// recognise, maps to `Unfit`.
pub fn verdict_from_label(label: &str) -> Verdict {
    let normalized = label.trim().to_ascii_lowercase();
    if AFFIRMATIVE_LABELS.contains(&normalized.as_str()) {
        Verdict::Fit
    } else {
        Verdict::Unfit
    }
}
