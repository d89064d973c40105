//! Handler for the `/register` resource.
//!
//! One linear flow: validate, convert, upload the screenshot (if any),
//! insert. A failed upload stops before anything is written; a failed
//! insert after a successful upload leaves that asset in the store.

use std::io::Write;
use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use intake_cloud::{AssetBytes, AssetSource, UploadedAsset};
use intake_core::registration::{validate_submission, RegistrationDraft};
use intake_db::models::registration::CreateRegistration;
use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};
use crate::middleware::submission::Submission;
use crate::response::{MessageResponse, MSG_REGISTRATION_SUCCESSFUL};
use crate::state::AppState;

/// POST /register
///
/// Accepts the registration form (multipart, or JSON without a file).
/// Returns 201 with a confirmation message; the stored record is not
/// echoed back.
pub async fn register(
    State(state): State<AppState>,
    submission: Submission,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let Submission { form, screenshot } = submission;

    validate_submission(&form, screenshot.is_some())?;
    let draft = RegistrationDraft::from_form(&form)?;

    let payment_screenshot = match screenshot {
        Some(asset) => Some(upload_screenshot(&state, asset).await?.url),
        None => None,
    };

    let input = CreateRegistration::from_draft(draft, payment_screenshot);
    let id = state.store.insert(&input).await?;

    tracing::info!(
        registration_id = id,
        payment_mode = %input.payment_mode,
        has_screenshot = input.payment_screenshot.is_some(),
        "Registration created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(MSG_REGISTRATION_SUCCESSFUL)),
    ))
}

/// Upload from memory, or via a spooled temp file when a spool directory
/// is configured. The temp file is removed once the upload call returns.
async fn upload_screenshot(state: &AppState, asset: AssetBytes) -> AppResult<UploadedAsset> {
    let folder = state.config.upload_folder.as_str();

    let Some(spool_dir) = state.config.screenshot_spool_dir.clone() else {
        return Ok(state
            .uploader
            .upload(AssetSource::Bytes(asset), folder)
            .await?);
    };

    let spooled = spool_to_disk(spool_dir, asset).await?;
    let result = state
        .uploader
        .upload(AssetSource::Path(spooled.path().to_path_buf()), folder)
        .await;

    let path = spooled.path().to_path_buf();
    if let Err(e) = spooled.close() {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove spooled screenshot");
    }

    Ok(result?)
}

/// Write the screenshot to a named temp file in `dir`, keeping an
/// extension that matches its content type.
async fn spool_to_disk(dir: std::path::PathBuf, asset: AssetBytes) -> AppResult<NamedTempFile> {
    tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        std::fs::create_dir_all(&dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("screenshot-")
            .suffix(spool_extension(&asset))
            .tempfile_in(&dir)?;
        file.write_all(&asset.data)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Spool task failed: {e}")))?
    .map_err(|e| AppError::InternalError(format!("Failed to spool screenshot: {e}")))
}

/// Extension for the spooled file, taken from the content type and falling
/// back to the client's filename.
fn spool_extension(asset: &AssetBytes) -> &'static str {
    match asset.content_type.as_str() {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "image/heic" => ".heic",
        "image/bmp" => ".bmp",
        _ => asset
            .file_name
            .as_deref()
            .and_then(|f| Path::new(f).extension())
            .and_then(|e| match e.to_string_lossy().to_ascii_lowercase().as_str() {
                "png" => Some(".png"),
                "jpg" | "jpeg" => Some(".jpg"),
                "webp" => Some(".webp"),
                "gif" => Some(".gif"),
                _ => None,
            })
            .unwrap_or(""),
    }
}
