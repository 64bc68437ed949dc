//! # Image Storage
//!
//! Flat on-disk storage for uploaded images. Files are written once under
//! their generated name and never modified or deleted by the server; the
//! filename is the only identity the server keeps.

use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Handle to the upload directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet. Idempotent;
    /// failure here is fatal at startup.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create upload directory {}", self.dir.display()))
    }

    /// Resolve a requested filename to a path inside the upload directory.
    ///
    /// Only a single normal path component is accepted: names containing
    /// separators, `..` segments, or an absolute prefix resolve to `None`,
    /// so a request can never read outside the upload directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let requested = Path::new(name);
        let mut components = requested.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.dir.join(requested)),
            _ => None,
        }
    }

    /// Read a stored file in full. `Ok(None)` when no regular file exists
    /// under `name`.
    pub async fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(tokio::fs::read(&path).await?)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a new file, refusing to overwrite an existing one. Callers
    /// retry with a freshly generated name on `AlreadyExists`.
    pub async fn save_new(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.dir.join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        store.save_new("20240101_a1b2c3d4.png", b"image bytes").await.unwrap();

        let read = store.read("20240101_a1b2c3d4.png").await.unwrap();
        assert_eq!(read.as_deref(), Some(b"image bytes".as_slice()));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        assert!(store.read("nope.png").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_new_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        store.save_new("x.png", b"first").await.unwrap();
        let err = store.save_new("x.png", b"second").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);

        // First write is untouched
        let read = store.read("x.png").await.unwrap();
        assert_eq!(read.as_deref(), Some(b"first".as_slice()));
    }

    // Requested names are untrusted. Only a single normal path component
    // may reach the join, so a request can never escape the upload
    // directory.
    #[test]
    fn test_resolve_hardens_parent_traversal() {
        let store = ImageStore::new("uploads");

        assert!(store.resolve("a.png").is_some());
        assert!(store.resolve("../a.png").is_none());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("a/b.png").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("").is_none());
    }

    #[tokio::test]
    async fn test_read_traversal_name_is_none_even_if_target_exists() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("secret.txt");
        std::fs::write(&outside, b"secret").unwrap();

        let upload_dir = tmp.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).unwrap();
        let store = ImageStore::new(&upload_dir);

        assert!(store.read("../secret.txt").await.unwrap().is_none());
    }
}
