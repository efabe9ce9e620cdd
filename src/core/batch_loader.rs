use crate::core::track_parser::parse_reader;
use crate::domain::model::{Batch, FieldSet, Track};
use crate::domain::ports::Storage;
use crate::utils::error::{MultiplesError, Result};
use std::path::{Path, PathBuf};

/// Runs with this many files or fewer are refused.
pub const DEFAULT_MIN_FILES: usize = 4;

pub struct BatchLoader<'a, S: Storage> {
    storage: &'a S,
    fields: FieldSet,
    min_files: usize,
}

impl<'a, S: Storage> BatchLoader<'a, S> {
    pub fn new(storage: &'a S, fields: FieldSet, min_files: usize) -> Self {
        Self {
            storage,
            fields,
            min_files,
        }
    }

    /// Parses every path in order. The first failing file aborts the batch.
    pub async fn load(&self, paths: &[PathBuf]) -> Result<Batch> {
        if paths.len() <= self.min_files {
            return Err(MultiplesError::InsufficientFiles {
                found: paths.len(),
                required: self.min_files + 1,
            });
        }

        tracing::info!("{} file(s) found. Parsing GPX files...", paths.len());

        let mut batch = Batch::with_capacity(paths.len());
        for path in paths {
            let track = self
                .load_one(path)
                .await
                .map_err(|source| MultiplesError::BatchLoad {
                    path: path.clone(),
                    source: Box::new(source),
                })?;
            batch.push(path.clone(), track);
        }
        Ok(batch)
    }

    async fn load_one(&self, path: &Path) -> Result<Track> {
        let data = self.storage.read_file(path).await?;
        let span = tracing::info_span!("track", file = %path.display());
        span.in_scope(|| parse_reader(data.as_slice(), self.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
        reads: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MockStorage {
        async fn insert(&self, path: &str, content: String) {
            self.files
                .lock()
                .await
                .insert(PathBuf::from(path), content.into_bytes());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            self.reads.lock().await.push(path.to_path_buf());
            self.files.lock().await.get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into()
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(PathBuf::from(path), data.to_vec());
            Ok(())
        }
    }

    fn single_point(lat: f64) -> String {
        format!(
            r#"<gpx><trk><trkseg><trkpt lat="{}" lon="8.0"><ele>1</ele></trkpt></trkseg></trk></gpx>"#,
            lat
        )
    }

    async fn storage_with(names: &[&str]) -> (MockStorage, Vec<PathBuf>) {
        let storage = MockStorage::default();
        let mut paths = Vec::new();
        for (i, name) in names.iter().enumerate() {
            storage.insert(name, single_point(i as f64)).await;
            paths.push(PathBuf::from(name));
        }
        (storage, paths)
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let (storage, paths) =
            storage_with(&["e.gpx", "a.gpx", "d.gpx", "b.gpx", "c.gpx"]).await;
        let loader = BatchLoader::new(&storage, FieldSet::POSITION, DEFAULT_MIN_FILES);

        let batch = loader.load(&paths).await.unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.paths(), paths.as_slice());
        for (i, track) in batch.tracks().iter().enumerate() {
            assert_eq!(track.points()[0].lat, i as f64);
        }
        assert_eq!(*storage.reads.lock().await, paths);
    }

    #[tokio::test]
    async fn test_too_few_files_fail_before_reading() {
        let (storage, paths) = storage_with(&["a.gpx", "b.gpx", "c.gpx", "d.gpx"]).await;
        let loader = BatchLoader::new(&storage, FieldSet::POSITION, DEFAULT_MIN_FILES);

        let err = loader.load(&paths).await.unwrap_err();

        assert!(matches!(
            err,
            MultiplesError::InsufficientFiles {
                found: 4,
                required: 5
            }
        ));
        assert!(storage.reads.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_custom_minimum() {
        let (storage, paths) = storage_with(&["a.gpx", "b.gpx"]).await;
        let loader = BatchLoader::new(&storage, FieldSet::ELEVATION, 1);
        assert_eq!(loader.load(&paths).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_parse_failure_aborts_with_path() {
        let (storage, mut paths) =
            storage_with(&["a.gpx", "b.gpx", "c.gpx", "d.gpx", "e.gpx"]).await;
        storage
            .insert("broken.gpx", "<gpx><trk><trkseg>".to_string())
            .await;
        paths.insert(2, PathBuf::from("broken.gpx"));
        let loader = BatchLoader::new(&storage, FieldSet::POSITION, DEFAULT_MIN_FILES);

        let err = loader.load(&paths).await.unwrap_err();

        match err {
            MultiplesError::BatchLoad { path, source } => {
                assert_eq!(path, PathBuf::from("broken.gpx"));
                assert!(matches!(*source, MultiplesError::Parse { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // nothing after the broken file is read
        assert_eq!(storage.reads.lock().await.len(), 3);
    }
}
