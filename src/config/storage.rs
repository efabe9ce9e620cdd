use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem storage. Reads take paths as given (relative to the working
/// directory); writes land under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = tokio::fs::read(path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_are_rooted_and_create_parents() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("out"));

        storage
            .write_file("tracks/a.csv", b"lat,lon\n")
            .await
            .unwrap();

        let written = dir.path().join("out/tracks/a.csv");
        assert_eq!(storage.read_file(&written).await.unwrap(), b"lat,lon\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let storage = LocalStorage::new("unused");
        let err = storage
            .read_file(Path::new("/definitely/not/here.gpx"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::utils::error::MultiplesError::IoError(_)));
    }
}
