#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use intake_api::config::{CorsOrigins, ServerConfig};
use intake_api::router::build_app_router;
use intake_api::state::AppState;
use intake_cloud::{AssetBytes, AssetSource, AssetUploader, UploadError, UploadedAsset};
use intake_core::types::DbId;
use intake_db::models::registration::CreateRegistration;
use intake_db::store::RegistrationStore;
use tower::ServiceExt;

/// URL returned by [`FakeUploader`] on success.
pub const FAKE_ASSET_URL: &str =
    "https://res.cloudinary.com/demo/image/upload/v1/mandir_upload/abc123.png";

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// `RegistrationStore` that keeps rows in memory and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<CreateRegistration>>,
    fail: AtomicBool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn rows(&self) -> Vec<CreateRegistration> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn insert(&self, input: &CreateRegistration) -> Result<DbId, sqlx::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(input.clone());
        Ok(rows.len() as DbId)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake uploader
// ---------------------------------------------------------------------------

/// One call observed by [`FakeUploader`].
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub folder: String,
    pub data: Vec<u8>,
    pub content_type: String,
    /// Set when the call came in through the on-disk variant.
    pub spooled_path: Option<PathBuf>,
}

/// `AssetUploader` that records calls and returns a fixed URL, or fails.
#[derive(Default)]
pub struct FakeUploader {
    calls: Mutex<Vec<UploadCall>>,
    fail: AtomicBool,
}

impl FakeUploader {
    pub fn failing() -> Self {
        let uploader = Self::default();
        uploader.fail.store(true, Ordering::SeqCst);
        uploader
    }

    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        asset: AssetBytes,
        folder: &str,
        spooled_path: Option<PathBuf>,
    ) -> Result<UploadedAsset, UploadError> {
        self.calls.lock().unwrap().push(UploadCall {
            folder: folder.to_string(),
            data: asset.data,
            content_type: asset.content_type,
            spooled_path,
        });

        if self.fail.load(Ordering::SeqCst) {
            return Err(UploadError::Rejected {
                status: 503,
                message: "asset store unavailable".into(),
            });
        }
        Ok(UploadedAsset {
            url: FAKE_ASSET_URL.to_string(),
            public_id: Some("mandir_upload/abc123".into()),
        })
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload_bytes(
        &self,
        asset: AssetBytes,
        folder: &str,
    ) -> Result<UploadedAsset, UploadError> {
        self.record(asset, folder, None)
    }

    async fn upload(&self, source: AssetSource, folder: &str) -> Result<UploadedAsset, UploadError> {
        match source {
            AssetSource::Bytes(asset) => self.record(asset, folder, None),
            AssetSource::Path(path) => {
                let asset = AssetBytes::read_path(&path).await?;
                self.record(asset, folder, Some(path))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and uploads from memory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::List(vec!["http://localhost:5173".parse().unwrap()]),
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        upload_folder: "mandir_upload".to_string(),
        screenshot_spool_dir: None,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the given fakes.
pub fn build_test_app_with(
    config: ServerConfig,
    store: Arc<MemoryStore>,
    uploader: Arc<FakeUploader>,
) -> Router {
    let state = AppState {
        store,
        uploader,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub fn build_test_app(store: Arc<MemoryStore>, uploader: Arc<FakeUploader>) -> Router {
    build_test_app_with(test_config(), store, uploader)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, body: MultipartBody) -> Response<Body> {
    let (content_type, bytes) = body.finish();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(bytes))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----intake-test-boundary-7MA4YWxkTrZu0gW";

/// Minimal `multipart/form-data` encoder for building request bodies.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Append every `(name, value)` pair as a text field.
    pub fn fields(self, pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .fold(self, |body, (name, value)| body.text(name, value))
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.buf)
    }
}

// ---------------------------------------------------------------------------
// Form fixtures
// ---------------------------------------------------------------------------

/// A complete offline (`cash`) submission, in wire field names.
pub fn offline_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Asha Verma"),
        ("fatherName", "Ravi Verma"),
        ("age", "34"),
        ("dob", "1991-04-12"),
        ("mobile", "9876543210"),
        ("email", "asha@example.com"),
        ("address", "12 Temple Road"),
        ("membership", "life"),
        ("date", "2025-01-15"),
        ("paymentMode", "cash"),
    ]
}

/// A complete online submission with `amount=500` (the file is added
/// separately).
pub fn online_fields() -> Vec<(&'static str, &'static str)> {
    let mut fields: Vec<_> = offline_fields()
        .into_iter()
        .map(|(k, v)| if k == "paymentMode" { (k, "online") } else { (k, v) })
        .collect();
    fields.push(("amount", "500"));
    fields
}

/// `fields` with one entry removed.
pub fn without(
    fields: Vec<(&'static str, &'static str)>,
    name: &str,
) -> Vec<(&'static str, &'static str)> {
    fields.into_iter().filter(|(k, _)| *k != name).collect()
}

/// Tiny PNG-looking payload.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
