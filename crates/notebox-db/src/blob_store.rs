//! Filesystem blob store for uploaded file bytes.
//!
//! Blobs live flat in one directory, named `{uuid}{ext}` by the note service.
//! Every name is checked with [`is_safe_blob_name`] before it touches the
//! filesystem, so nothing can resolve outside the root.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use notebox_core::{is_safe_blob_name, BlobReader, BlobStore, Error, Result};

/// Blob store backed by a local directory.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStore {
    root: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a store rooted at `root`. The directory is created by [`Self::validate`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The blob directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> Result<PathBuf> {
        if !is_safe_blob_name(name) {
            return Err(Error::InvalidInput(format!("Invalid blob name: {}", name)));
        }
        Ok(self.root.join(name))
    }

    /// Create the blob directory and check it can write, read, and delete files.
    ///
    /// Run at startup so permission problems show up before the first upload.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", self.root, e))?;

        let test_file = self.root.join(".health-check");
        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;

        Ok(())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(name)?;
        debug!(blob_name = %name, full_path = %full_path.display(), size_bytes = data.len(), "blob_store: write");

        fs::create_dir_all(&self.root).await.map_err(|e| {
            warn!(root = %self.root.display(), error = %e, "blob_store: create_dir_all failed");
            e
        })?;

        // Atomic write: temp file + rename
        let temp_path = self.root.join(format!(".{}.tmp", name));
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "blob_store: File::create failed");
            e
        })?;
        if let Err(e) = file.write_all(data).await {
            warn!(error = %e, "blob_store: write_all failed");
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "blob_store: rename failed");
            e
        })?;

        // rw-r--r--, never executable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    async fn open(&self, name: &str) -> Result<BlobReader> {
        let full_path = self.full_path(name)?;
        let file = match fs::File::open(&full_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound("File not found".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(Error::NotFound("File not found".to_string()));
        }

        Ok(BlobReader {
            reader: Box::new(file),
            len: metadata.len(),
        })
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let full_path = self.full_path(name)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let full_path = self.full_path(name)?;
        Ok(fs::try_exists(full_path).await?)
    }
}
