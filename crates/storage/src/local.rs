//! Local-disk asset store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::{AssetFolder, AssetStore, StorageError, Upload};

/// URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Writes uploads to `{root}/{folder}/{uuid}-{name}`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the folder directories up front.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        for folder in [AssetFolder::Artists, AssetFolder::Releases] {
            fs::create_dir_all(self.root.join(folder.as_str())).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, upload: &Upload, folder: AssetFolder) -> Result<String, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::EmptyUpload);
        }

        let file_name = format!("{}-{}", uuid::Uuid::new_v4(), upload.sanitized_file_name());
        let dir = self.root.join(folder.as_str());
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&file_name), &upload.bytes).await?;

        let url = format!("{PUBLIC_PREFIX}/{folder}/{file_name}");
        tracing::info!(%url, bytes = upload.bytes.len(), "Stored asset on local disk");
        Ok(url)
    }
}
