use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::screening::Verdict;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),

    #[error("failed to place {} into {}: {source}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Places byte-identical copies of screened documents under `<root>/fit` or
/// `<root>/unfit`.
#[derive(Debug, Clone)]
pub struct OutputRouter {
    root: PathBuf,
}

impl OutputRouter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn directory_for(&self, verdict: Verdict) -> PathBuf {
        self.root.join(verdict.as_str())
    }

    /// Copies `source` into the directory for `verdict`, creating it if absent.
    /// An existing copy with the same name is overwritten.
    pub async fn place(&self, source: &Path, verdict: Verdict) -> Result<PathBuf, PlacementError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| PlacementError::NoFileName(source.to_path_buf()))?;

        let directory = self.directory_for(verdict);
        let destination = directory.join(file_name);
        let io_error = |source_err| PlacementError::Io {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: source_err,
        };

        tokio::fs::create_dir_all(&directory).await.map_err(io_error)?;
        tokio::fs::copy(source, &destination).await.map_err(io_error)?;

        Ok(destination)
    }
}

/// Writes `text` to `path`, creating parent directories first.
pub async fn save_text_to_file(text: &str, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_place_creates_verdict_directory_and_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alice.pdf");
        std::fs::write(&source, b"%PDF-1.4 alice").unwrap();

        let router = OutputRouter::new(dir.path().join("out"));
        let destination = router.place(&source, Verdict::Fit).await.unwrap();

        assert_eq!(destination, dir.path().join("out").join("fit").join("alice.pdf"));
        assert_eq!(std::fs::read(&destination).unwrap(), b"%PDF-1.4 alice");
        assert!(source.exists(), "source must be copied, not moved");
    }

    #[tokio::test]
    async fn test_place_is_idempotent_on_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let router = OutputRouter::new(dir.path());
        for name in ["a.pdf", "b.pdf"] {
            let source = dir.path().join(name);
            std::fs::write(&source, name).unwrap();
            router.place(&source, Verdict::Unfit).await.unwrap();
        }
        router
            .place(&dir.path().join("a.pdf"), Verdict::Unfit)
            .await
            .unwrap();

        let copies = std::fs::read_dir(router.directory_for(Verdict::Unfit))
            .unwrap()
            .count();
        assert_eq!(copies, 2);
    }

    #[tokio::test]
    async fn test_place_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = OutputRouter::new(dir.path());
        let err = router
            .place(&dir.path().join("ghost.pdf"), Verdict::Unfit)
            .await
            .unwrap_err();
        assert!(matches!(err, PlacementError::Io { .. }));
    }

    #[tokio::test]
    async fn test_place_rejects_path_without_file_name() {
        let router = OutputRouter::new("out");
        let err = router.place(Path::new("/"), Verdict::Fit).await.unwrap_err();
        assert!(matches!(err, PlacementError::NoFileName(_)));
    }

    #[tokio::test]
    async fn test_save_text_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("data/job_descriptions/text/job_description.txt");

        save_text_to_file("Backend engineer", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Backend engineer");
    }
}
