use std::path::Path;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::screening::BatchResult;

/// Serialized form of a batch: the result plus its bucket counts.
#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    fit_count: usize,
    unfit_count: usize,
    total: usize,
    #[serde(flatten)]
    result: &'a BatchResult,
}

impl<'a> From<&'a BatchResult> for BatchReport<'a> {
    fn from(result: &'a BatchResult) -> Self {
        Self {
            fit_count: result.fit.len(),
            unfit_count: result.unfit.len(),
            total: result.total(),
            result,
        }
    }
}

/// Writes the batch outcome as pretty-printed JSON.
pub async fn write_report(result: &BatchResult, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&BatchReport::from(result))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| AppError::Report {
                path: path.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, json)
        .await
        .map_err(|source| AppError::Report {
            path: path.to_path_buf(),
            source,
        })
}
