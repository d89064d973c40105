use std::path::PathBuf;

/// Errors from uploading an asset to the external store.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// A spooled file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The asset store answered with a non-2xx status.
    #[error("Asset store rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A 2xx response that did not contain a usable URL.
    #[error("Malformed asset store response: {0}")]
    MalformedResponse(String),
}
