use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use intake_cloud::cloudinary::{CloudinaryConfig, DEFAULT_API_BASE};
use intake_core::registration::DEFAULT_UPLOAD_FOLDER;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which origins CORS allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin, without credentials.
    Any,
    /// An explicit allow-list.
    List(Vec<HeaderValue>),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Asset-store folder for payment screenshots (default: `mandir_upload`).
    pub upload_folder: String,
    /// When set, screenshots are written to a temporary file here and
    /// uploaded from disk instead of from memory.
    pub screenshot_spool_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default         |
    /// |------------------------|-----------------|
    /// | `HOST`                 | `0.0.0.0`       |
    /// | `PORT`                 | `5000`          |
    /// | `CORS_ORIGINS`         | `*`             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`            |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`      |
    /// | `UPLOAD_FOLDER`        | `mandir_upload` |
    /// | `SCREENSHOT_SPOOL_DIR` | unset           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary
    /// key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", lookup("PORT"), 5000u16)?;
        let cors_origins = parse_cors_origins(lookup("CORS_ORIGINS").as_deref().unwrap_or("*"))?;
        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", lookup("REQUEST_TIMEOUT_SECS"), 30u64)?;
        let max_upload_bytes =
            parse_or("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), 10 * 1024 * 1024usize)?;

        let upload_folder = lookup("UPLOAD_FOLDER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.into());

        let screenshot_spool_dir = lookup("SCREENSHOT_SPOOL_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            upload_folder,
            screenshot_spool_dir,
        })
    }
}

/// Load Cloudinary credentials.
///
/// | Env Var                 | Default                      |
/// |-------------------------|------------------------------|
/// | `CLOUDINARY_CLOUD_NAME` | required                     |
/// | `CLOUDINARY_API_KEY`    | required                     |
/// | `CLOUDINARY_API_SECRET` | required                     |
/// | `CLOUDINARY_API_BASE`   | `https://api.cloudinary.com` |
/// | `UPLOAD_TIMEOUT_SECS`   | `30`                         |
pub fn cloudinary_config_from_env() -> Result<CloudinaryConfig, ConfigError> {
    cloudinary_config_from_lookup(|key| std::env::var(key).ok())
}

pub fn cloudinary_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CloudinaryConfig, ConfigError> {
    let required = |name: &'static str| {
        lookup(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(name))
    };

    let mut config = CloudinaryConfig::new(
        required("CLOUDINARY_CLOUD_NAME")?,
        required("CLOUDINARY_API_KEY")?,
        required("CLOUDINARY_API_SECRET")?,
    );
    config.api_base = lookup("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());
    config.timeout = Duration::from_secs(parse_or(
        "UPLOAD_TIMEOUT_SECS",
        lookup("UPLOAD_TIMEOUT_SECS"),
        30u64,
    )?);
    Ok(config)
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{raw}': {e}"),
        }),
    }
}

fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    origins
        .into_iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                reason: format!("'{o}': {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
