//! The uploader abstraction and its two input variants.
//!
//! In-memory bytes are the canonical input. An on-disk file is adapted by
//! reading it into [`AssetBytes`]; the caller keeps ownership of the file
//! and removes it afterwards.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::UploadError;

/// Content type used when the real one is unknown.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An image held in memory.
#[derive(Debug, Clone)]
pub struct AssetBytes {
    pub data: Vec<u8>,
    pub content_type: String,
    /// The client-supplied filename. Informational only; it never becomes
    /// the stored asset's identity.
    pub file_name: Option<String>,
}

impl AssetBytes {
    /// Read a file into memory, inferring the content type from its
    /// extension.
    pub async fn read_path(path: &Path) -> Result<Self, UploadError> {
        let data = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            data,
            content_type: content_type_for_path(path).to_string(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        })
    }
}

/// What to upload.
#[derive(Debug, Clone)]
pub enum AssetSource {
    Bytes(AssetBytes),
    /// A temporary file owned by the caller.
    Path(PathBuf),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Public HTTPS URL of the stored asset.
    pub url: String,
    /// Store-assigned identifier, when the store reports one.
    pub public_id: Option<String>,
}

/// Uploads images to an external asset store.
///
/// Failures propagate unchanged; implementations must not retry.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Upload in-memory bytes into `folder`.
    async fn upload_bytes(
        &self,
        asset: AssetBytes,
        folder: &str,
    ) -> Result<UploadedAsset, UploadError>;

    /// Upload from either input variant.
    async fn upload(&self, source: AssetSource, folder: &str) -> Result<UploadedAsset, UploadError> {
        match source {
            AssetSource::Bytes(asset) => self.upload_bytes(asset, folder).await,
            AssetSource::Path(path) => {
                let asset = AssetBytes::read_path(&path).await?;
                self.upload_bytes(asset, folder).await
            }
        }
    }
}

/// Map an image file extension to its MIME type.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    /// Records what reached `upload_bytes`.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(AssetBytes, String)>>,
    }

    #[async_trait]
    impl AssetUploader for Recording {
        async fn upload_bytes(
            &self,
            asset: AssetBytes,
            folder: &str,
        ) -> Result<UploadedAsset, UploadError> {
            self.seen.lock().unwrap().push((asset, folder.to_string()));
            Ok(UploadedAsset {
                url: "https://assets.test/1".into(),
                public_id: None,
            })
        }
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for_path(Path::new("/tmp/x.jpg")), "image/jpeg");
        assert_eq!(content_type_for_path(Path::new("noext")), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for_path(Path::new("a.txt")), FALLBACK_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn path_variant_reads_file_and_delegates() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG fake").unwrap();

        let uploader = Recording::default();
        let uploaded = uploader
            .upload(AssetSource::Path(file.path().to_path_buf()), "receipts")
            .await
            .unwrap();
        assert_eq!(uploaded.url, "https://assets.test/1");

        let seen = uploader.seen.lock().unwrap();
        let (asset, folder) = &seen[0];
        assert_eq!(asset.data, b"\x89PNG fake");
        assert_eq!(asset.content_type, "image/png");
        assert_eq!(folder, "receipts");

        // The uploader never removes the caller's file.
        assert!(file.path().exists());
    }

    #[tokio::test]
    async fn missing_path_is_io_error() {
        let uploader = Recording::default();
        let result = uploader
            .upload(AssetSource::Path("/nonexistent/screenshot.png".into()), "f")
            .await;

        assert_matches!(result, Err(UploadError::Io { .. }));
        assert!(uploader.seen.lock().unwrap().is_empty());
    }
}
