//! Text extraction — turns a `DocumentHandle` into plain text.
//!
//! Callers treat every `ExtractionError` (and empty text) as "no text": the batch
//! keeps going, only the job description is load-bearing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::screening::DocumentHandle;

pub mod pdf;
pub mod web;

pub use web::{WebSettings, WebTextSource};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported document type: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("no extractable text in {0}")]
    NoText(String),

    #[error("text extractor panicked on {}", .0.display())]
    Panicked(PathBuf),
}

/// Supplies raw text for job descriptions and resumes.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, handle: &DocumentHandle) -> Result<String, ExtractionError>;
}

/// Default source: PDFs and plain-text files from disk, web pages over HTTP.
pub struct DocumentTextSource {
    web: WebTextSource,
}

impl DocumentTextSource {
    pub fn new(web: WebTextSource) -> Self {
        Self { web }
    }
}

#[async_trait]
impl TextSource for DocumentTextSource {
    async fn extract_text(&self, handle: &DocumentHandle) -> Result<String, ExtractionError> {
        let text = match handle {
            DocumentHandle::File(path) => extract_file(path).await?,
            DocumentHandle::Url(url) => self.web.fetch_text(url).await?,
        };
        require_text(text, handle)
    }
}

async fn extract_file(path: &Path) -> Result<String, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf::extract_pdf_text(path).await,
        "txt" | "text" | "md" => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ExtractionError::Io {
                    path: path.to_path_buf(),
                    source,
                })
        }
        _ => Err(ExtractionError::Unsupported(path.to_path_buf())),
    }
}

/// Whitespace-only output counts as a failed extraction.
fn require_text(text: String, handle: &DocumentHandle) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::NoText(handle.to_string()))
    } else {
        Ok(text)
    }
}
