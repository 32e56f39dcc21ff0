use std::path::PathBuf;

use melodia_storage::CloudinaryConfig;

/// Where uploaded images are kept.
#[derive(Debug, Clone)]
pub enum AssetBackend {
    /// Files under `ServerConfig::upload_dir`, served at `/uploads`.
    Local,
    Cloudinary(CloudinaryConfig),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory of the local asset store (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Largest accepted request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    pub assets: AssetBackend,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `UPLOAD_DIR`             | `uploads`               |
    /// | `MAX_UPLOAD_BYTES`       | `10485760`              |
    /// | `ASSET_STORE`            | `local`                 |
    /// | `CLOUDINARY_ROOT_FOLDER` | `melodia`               |
    ///
    /// With `ASSET_STORE=cloudinary`, `CLOUDINARY_CLOUD_NAME`,
    /// `CLOUDINARY_API_KEY` and `CLOUDINARY_API_SECRET` are required.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
        );

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let assets = match std::env::var("ASSET_STORE")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => AssetBackend::Local,
            "cloudinary" => AssetBackend::Cloudinary(CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME"),
                api_key: required("CLOUDINARY_API_KEY"),
                api_secret: required("CLOUDINARY_API_SECRET"),
                root_folder: std::env::var("CLOUDINARY_ROOT_FOLDER")
                    .unwrap_or_else(|_| "melodia".into()),
            }),
            other => panic!("ASSET_STORE must be 'local' or 'cloudinary', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            max_upload_bytes,
            assets,
        }
    }
}

fn required(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}
