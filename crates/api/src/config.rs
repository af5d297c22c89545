use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`
    /// env var. The default `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Video
    /// analysis decodes and scores every sampled frame inside the
    /// request, so the limit is generous.
    pub request_timeout_secs: u64,
    /// Directory where uploads are staged during analysis.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Directory served at `/static` (also holds the page shells).
    pub static_dir: PathBuf,
    /// Video sampling rate in frames per second of footage
    /// (default: `1`).
    pub sample_rate: f64,
    /// Hugging Face repository the classifier weights come from.
    pub model_repo: String,
    /// Local directory with `config.json` and `model.safetensors`,
    /// used instead of the hub when set.
    pub model_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                 |
    /// | `PORT`                 | `5000`                                    |
    /// | `CORS_ORIGINS`         | `*`                                       |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                                     |
    /// | `UPLOAD_DIR`           | `uploads`                                 |
    /// | `MAX_UPLOAD_MB`        | `50`                                      |
    /// | `STATIC_DIR`           | `static`                                  |
    /// | `SAMPLE_RATE`          | `1`                                       |
    /// | `MODEL_REPO`           | `dima806/deepfake_vs_real_image_detection`|
    /// | `MODEL_DIR`            | unset                                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_mb: usize = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        let static_dir = PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()));

        let sample_rate: f64 = std::env::var("SAMPLE_RATE")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("SAMPLE_RATE must be a valid number");

        let model_repo = std::env::var("MODEL_REPO")
            .unwrap_or_else(|_| veriframe_classifier::vit::DEFAULT_MODEL_REPO.into());

        let model_dir = std::env::var("MODEL_DIR").ok().map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            static_dir,
            sample_rate,
            model_repo,
            model_dir,
        }
    }
}
