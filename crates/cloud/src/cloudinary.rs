//! Signed image uploads to Cloudinary.
//!
//! Every upload lets Cloudinary assign a unique public ID (`unique_filename`
//! with no `public_id`) and sets `overwrite=false`, so two screenshots that
//! share a filename are stored as two distinct assets.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::UploadError;
use crate::uploader::{AssetBytes, AssetUploader, UploadedAsset};

/// Default Cloudinary API host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Default timeout for a single upload request.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Filename sent for the multipart file part when the client gave none.
const FALLBACK_FILE_NAME: &str = "upload";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Account credentials and endpoint settings.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Scheme and host of the upload API, without a trailing slash.
    pub api_base: String,
    pub timeout: Duration,
}

impl CloudinaryConfig {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            cloud_name,
            api_key,
            api_secret,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Full image upload endpoint for this account.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Compute the request signature for a set of upload parameters.
///
/// Parameters are sorted by name, joined as `name=value` with `&`, the API
/// secret is appended, and the SHA-256 hex digest is returned. Empty values
/// are left out, matching how the API verifies signatures.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let hash = Sha256::digest(format!("{to_sign}{api_secret}").as_bytes());
    format!("{hash:x}")
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

/// [`AssetUploader`] that talks to the Cloudinary upload API.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    /// Build an uploader with its own HTTP client using the configured
    /// timeout.
    pub fn new(config: CloudinaryConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Build an uploader reusing an existing client.
    pub fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }

    /// Parameters covered by the signature, for a given folder and time.
    fn signed_params(folder: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        vec![
            ("folder", folder.to_string()),
            ("overwrite", "false".to_string()),
            ("timestamp", timestamp.to_string()),
            ("unique_filename", "true".to_string()),
        ]
    }

    async fn parse_response(response: reqwest::Response) -> Result<UploadedAsset, UploadError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        let url = parsed
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| UploadError::MalformedResponse("missing secure_url".into()))?;

        Ok(UploadedAsset {
            url,
            public_id: parsed.public_id,
        })
    }
}

#[async_trait]
impl AssetUploader for CloudinaryUploader {
    async fn upload_bytes(
        &self,
        asset: AssetBytes,
        folder: &str,
    ) -> Result<UploadedAsset, UploadError> {
        let timestamp = chrono::Utc::now().timestamp();
        let params = Self::signed_params(folder, timestamp);
        let signature = sign_params(&params, &self.config.api_secret);

        let size = asset.data.len();
        let file = Part::bytes(asset.data)
            .file_name(
                asset
                    .file_name
                    .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string()),
            )
            .mime_str(&asset.content_type)?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        tracing::debug!(folder, size, "Uploading asset to Cloudinary");

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await?;

        let uploaded = Self::parse_response(response).await?;
        tracing::info!(
            folder,
            public_id = uploaded.public_id.as_deref().unwrap_or(""),
            "Asset uploaded"
        );
        Ok(uploaded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
