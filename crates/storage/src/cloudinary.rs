//! Cloudinary asset store using the signed upload API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{AssetFolder, AssetStore, StorageError, Upload};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// HTTP timeout for a single upload.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Credentials and folder layout for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Prefix for every folder, e.g. `melodia` gives `melodia/artists`.
    pub root_folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

pub struct CloudinaryAssetStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryAssetStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    fn upload_url(&self) -> String {
        format!("{API_BASE}/{}/auto/upload", self.config.cloud_name)
    }

    fn folder_path(&self, folder: AssetFolder) -> String {
        format!("{}/{folder}", self.config.root_folder)
    }
}

/// Sign upload parameters: sort by key, join as `k=v` with `&`, append the
/// secret, SHA-256, lowercase hex.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn store(&self, upload: &Upload, folder: AssetFolder) -> Result<String, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::EmptyUpload);
        }

        let folder_path = self.folder_path(folder);
        let public_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", folder_path.as_str()),
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let mut file = Part::bytes(upload.bytes.clone()).file_name(upload.sanitized_file_name());
        if let Some(mime) = &upload.content_type {
            file = file.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder_path)
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => "Upload failed".to_string(),
            };
            tracing::error!(status = status.as_u16(), %message, "Cloudinary upload rejected");
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(url = %body.secure_url, %folder, "Stored asset on Cloudinary");
        Ok(body.secure_url)
    }
}
