//! Asset storage for uploaded artist and release images.
//!
//! [`AssetStore`] is the seam the HTTP layer stores uploads through. The
//! backend is picked once at startup:
//!
//! - [`LocalAssetStore`] writes under a directory served at `/uploads`.
//! - [`CloudinaryAssetStore`] pushes to Cloudinary with a signed upload.

use std::fmt;

use async_trait::async_trait;

pub mod cloudinary;
pub mod local;

pub use cloudinary::{CloudinaryAssetStore, CloudinaryConfig};
pub use local::LocalAssetStore;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Logical namespace an asset is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFolder {
    Artists,
    Releases,
}

impl AssetFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artists => "artists",
            Self::Releases => "releases",
        }
    }
}

impl fmt::Display for AssetFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name the client sent, e.g. `cover.png`.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// The client file name reduced to a safe single path component.
    ///
    /// Directory parts are dropped and anything outside `[A-Za-z0-9._-]`
    /// becomes `_`. Falls back to `upload` when nothing usable remains.
    pub fn sanitized_file_name(&self) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure to persist an asset.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote host answered but refused the upload.
    #[error("Asset host rejected upload (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Stores uploaded bytes and returns the public URL they are reachable at.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn store(&self, upload: &Upload, folder: AssetFolder) -> Result<String, StorageError>;
}
