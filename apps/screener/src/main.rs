mod batch;
mod classification;
mod cli;
mod config;
mod errors;
mod extraction;
mod inference_client;
mod models;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::batch::{discover_resumes, write_report, BatchOrchestrator, OutputRouter};
use crate::classification::{ModelClassifier, ResumeClassifier, SimilarityFallback};
use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::{DocumentTextSource, TextSource, WebTextSource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (CLI flags override the environment)
    let config = Config::from_env()?.with_overrides(cli.delay_ms, cli.threshold);

    // Initialize structured logging
    telemetry::init(&config)?;

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    run(&cli, &config).await?;

    Ok(())
}

async fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let web = WebTextSource::new(&config.web_settings())
        .context("Failed to build HTTP client for job description pages")?;
    let source: Arc<dyn TextSource> = Arc::new(DocumentTextSource::new(web));

    let resumes = discover_resumes(&cli.resume_folder).await?;
    info!(
        "Found {} resumes in {}",
        resumes.len(),
        cli.resume_folder.display()
    );

    let classifier = build_classifier(cli, config);
    let orchestrator =
        BatchOrchestrator::new(source, classifier, OutputRouter::new(cli.output_dir()))
            .with_delay(config.rate_limit_delay)
            .with_job_description_dump(config.job_description_dump_path());

    let result = orchestrator
        .run(&cli.job_description_handle(), &resumes)
        .await?;

    if let Some(path) = &cli.report {
        write_report(&result, path).await?;
        info!("Batch report written to {}", path.display());
    }

    Ok(())
}

/// Model-backed chain unless offline; an unusable backend degrades to fallback-only.
fn build_classifier(cli: &Cli, config: &Config) -> ResumeClassifier {
    let fallback = SimilarityFallback::new(config.similarity_threshold);
    if cli.offline {
        info!("Offline mode: classifying with TF-IDF similarity only");
        return ResumeClassifier::fallback_only(fallback);
    }

    match ModelClassifier::initialize(config.inference_settings()) {
        Ok(model) => ResumeClassifier::new(Arc::new(model), fallback)
            .with_primary_timeout(config.inference_timeout),
        Err(e) => {
            warn!("Model initialization failed, using TF-IDF fallback only: {e}");
            ResumeClassifier::fallback_only(fallback)
        }
    }
}
