use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// PDF resumes directly inside `folder`, sorted by file name.
///
/// Subdirectories are not searched, so `fit/` and `unfit/` output from an
/// earlier run is never screened again.
pub async fn discover_resumes(folder: &Path) -> Result<Vec<PathBuf>, AppError> {
    let folder_error = |source| AppError::ResumeFolder {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(folder_error)?;
    let mut resumes = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(folder_error)? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file && is_pdf(&path) {
            resumes.push(path);
        }
    }

    if resumes.is_empty() {
        return Err(AppError::NoResumes(folder.to_path_buf()));
    }

    resumes.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(resumes)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finds_top_level_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["carol.pdf", "alice.PDF", "bob.pdf", "notes.txt", "cover.docx"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("fit")).unwrap();
        std::fs::write(dir.path().join("fit").join("dave.pdf"), b"x").unwrap();

        let resumes = discover_resumes(dir.path()).await.unwrap();
        let names: Vec<_> = resumes
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alice.PDF", "bob.pdf", "carol.pdf"]);
    }

    #[tokio::test]
    async fn test_empty_folder_is_no_resumes_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();

        let err = discover_resumes(dir.path()).await.unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));
    }

    #[tokio::test]
    async fn test_missing_folder_is_folder_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_resumes(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, AppError::ResumeFolder { .. }));
    }
}
