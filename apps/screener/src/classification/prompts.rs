// Prompt fragments for the primary classifier.

/// How long a candidate may take to get up to speed and still count as a fit.
pub const TRAINING_WINDOW_WEEKS: u32 = 4;

/// Builds the screening instruction with both documents embedded.
///
/// Resume first: when the backend truncates, it is the tail of the job
/// description that gets cut.
pub fn build_screening_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "You screen resumes for a hiring team. Read the resume and the job description below \
         and decide whether the candidate fits the role, either with the skills they have today \
         or because they could realistically be trained for it within {TRAINING_WINDOW_WEEKS} weeks. \
         Answer \"fit\" if they do and \"unfit\" if they do not.\n\n\
         Resume:\n{resume_text}\n\n\
         Job Description:\n{job_description}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_documents_in_order() {
        let prompt = build_screening_prompt("RESUME BODY", "JD BODY");
        let resume_at = prompt.find("RESUME BODY").unwrap();
        let jd_at = prompt.find("JD BODY").unwrap();
        assert!(resume_at < jd_at);
    }

    #[test]
    fn test_prompt_mentions_training_window() {
        let prompt = build_screening_prompt("", "");
        assert!(prompt.contains("within 4 weeks"));
    }

    #[test]
    fn test_prompt_does_not_expand_braces_in_documents() {
        let prompt = build_screening_prompt("{job_description}", "{resume_text}");
        assert!(prompt.contains("Resume:\n{job_description}"));
        assert!(prompt.contains("Job Description:\n{resume_text}"));
    }
}
