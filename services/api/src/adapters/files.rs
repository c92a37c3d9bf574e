//! services/api/src/adapters/files.rs
//!
//! Disk-backed implementation of the `FileStore` port. Uploaded images and
//! pdfs live flat in a single content directory; the stored filename is the
//! only linkage between a database row and its files.

use async_trait::async_trait;
use chrono::Utc;
use pdf_shala_core::ports::{FileStore, PortError, PortResult};
use std::path::{Path, PathBuf};

/// A file store that writes uploads into a flat directory on local disk.
#[derive(Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the content directory if it does not exist yet.
    pub async fn ensure_root(&self) -> PortResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))
    }

    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }
}

/// Derives a collision-free stored name: the original stem with whitespace
/// collapsed to underscores, a millisecond timestamp suffix, and the original
/// extension.
fn storage_name(original_name: &str, now_millis: i64) -> String {
    let path = Path::new(original_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let stem: String = stem
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, now_millis, ext),
        None => format!("{}-{}", stem, now_millis),
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> PortResult<String> {
        let stored_name = storage_name(original_name, Utc::now().timestamp_millis());
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortError::Storage(format!("writing {}: {}", path.display(), e)))?;
        Ok(stored_name)
    }

    async fn remove(&self, stored_name: &str) -> PortResult<()> {
        let path = self.root.join(stored_name);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PortError::NotFound(format!("File {} not found", stored_name))
            } else {
                PortError::Storage(format!("removing {}: {}", path.display(), e))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> DiskFileStore {
        let root = std::env::temp_dir().join(format!("pdf-shala-test-{}", Uuid::new_v4()));
        DiskFileStore::new(root)
    }

    #[test]
    fn storage_name_sanitizes_and_keeps_extension() {
        let name = storage_name("React in Depth.pdf", 1755900000000);
        assert_eq!(name, "React_in_Depth-1755900000000.pdf");
    }

    #[test]
    fn storage_name_without_extension() {
        let name = storage_name("notes", 42);
        assert_eq!(name, "notes-42");
    }

    #[tokio::test]
    async fn save_then_remove_round_trip() {
        let store = temp_store();
        store.ensure_root().await.unwrap();

        let stored = store.save("cover image.png", b"png-bytes").await.unwrap();
        assert!(stored.starts_with("cover_image-"));
        assert!(stored.ends_with(".png"));
        assert!(store.path_of(&stored).exists());

        store.remove(&stored).await.unwrap();
        assert!(!store.path_of(&stored).exists());
    }

    #[tokio::test]
    async fn removing_a_missing_file_reports_not_found() {
        let store = temp_store();
        store.ensure_root().await.unwrap();

        let err = store.remove("ghost.pdf").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }
}
