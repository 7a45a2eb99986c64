use std::path::Path;

use tracing::debug;

use super::ExtractionError;

/// Extracts the text layer of a PDF.
///
/// Parsing runs on the blocking pool; a panic in the parser is reported as
/// `ExtractionError::Panicked` instead of tearing down the batch.
pub async fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Extracting text from {} ({} bytes)", path.display(), bytes.len());

    let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf {
            path: path.to_path_buf(),
            message: format!("{e:?}"),
        }),
        Err(_) => Err(ExtractionError::Panicked(path.to_path_buf())),
    }
}
