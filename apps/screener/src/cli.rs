use std::path::PathBuf;

use clap::Parser;

use crate::models::screening::DocumentHandle;

#[derive(Parser, Debug)]
#[command(
    name = "screener",
    about = "Screen a folder of PDF resumes against a job description into fit/ and unfit/",
    version
)]
pub struct Cli {
    /// Job description: a PDF or text file, or an http(s) URL of a job posting
    pub job_description: String,

    /// Folder containing the resume PDFs to screen
    pub resume_folder: PathBuf,

    /// Where the fit/ and unfit/ folders are created (defaults to the resume folder)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write the batch result as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Skip the model backend and classify with TF-IDF similarity only
    #[arg(long)]
    pub offline: bool,

    /// Pause between resumes, in milliseconds (overrides RATE_LIMIT_DELAY_MS)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Similarity threshold for the fallback (overrides SIMILARITY_THRESHOLD)
    #[arg(long)]
    pub threshold: Option<f64>,
}

impl Cli {
    pub fn job_description_handle(&self) -> DocumentHandle {
        DocumentHandle::parse(&self.job_description)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.resume_folder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments_and_defaults() {
        let cli = Cli::parse_from(["screener", "jd.pdf", "resumes"]);
        assert_eq!(
            cli.job_description_handle(),
            DocumentHandle::File(PathBuf::from("jd.pdf"))
        );
        assert_eq!(cli.output_dir(), PathBuf::from("resumes"));
        assert!(!cli.offline);
        assert_eq!(cli.delay_ms, None);
    }

    #[test]
    fn test_flags_and_url_job_description() {
        let cli = Cli::parse_from([
            "screener",
            "https://jobs.example.com/backend",
            "resumes",
            "--output-dir",
            "sorted",
            "--offline",
            "--delay-ms",
            "250",
            "--threshold",
            "0.3",
            "--report",
            "batch.json",
        ]);
        assert!(matches!(cli.job_description_handle(), DocumentHandle::Url(_)));
        assert_eq!(cli.output_dir(), PathBuf::from("sorted"));
        assert!(cli.offline);
        assert_eq!(cli.delay_ms, Some(250));
        assert_eq!(cli.threshold, Some(0.3));
        assert_eq!(cli.report, Some(PathBuf::from("batch.json")));
    }

    #[test]
    fn test_missing_resume_folder_is_rejected() {
        assert!(Cli::try_parse_from(["screener", "jd.pdf"]).is_err());
    }
}
