use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Seam over upload persistence so tests can substitute a fake.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Persist raw upload bytes under `filename`, returning the saved path.
    async fn put_object(&self, filename: &str, body: Bytes) -> anyhow::Result<PathBuf>;
}

/// Writes uploads to a directory on the local disk.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, filename: &str, body: Bytes) -> anyhow::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create uploads dir {}", self.root.display()))?;

        // The filename is used exactly as the client supplied it; concurrent
        // writes to the same name are last-writer-wins.
        let path = self.root.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_object_writes_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let path = storage
            .put_object("leaf.png", Bytes::from_static(b"pixels"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("leaf.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn put_object_overwrites_an_existing_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .put_object("leaf.png", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let path = storage
            .put_object("leaf.png", Bytes::from_static(b"second"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn put_object_creates_a_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("not").join("yet");
        let storage = LocalStorage::new(&nested);

        storage
            .put_object("leaf.png", Bytes::from_static(b"pixels"))
            .await
            .unwrap();

        assert!(nested.join("leaf.png").exists());
    }
}
