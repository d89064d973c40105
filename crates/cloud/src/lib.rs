//! Asset-store integration for payment screenshots.
//!
//! [`AssetUploader`] is the seam the intake handler depends on; the
//! production implementation is [`cloudinary::CloudinaryUploader`].

pub mod cloudinary;
pub mod error;
pub mod uploader;

pub use error::UploadError;
pub use uploader::{AssetBytes, AssetSource, AssetUploader, UploadedAsset};
