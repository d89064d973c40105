//! Extractor for the registration request body.
//!
//! Accepts `multipart/form-data` (text fields plus an optional
//! `paymentScreenshot` file) or `application/json` (text fields only) and
//! yields a [`Submission`]. Presence rules are not applied here.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use intake_cloud::uploader::{content_type_for_path, FALLBACK_CONTENT_TYPE};
use intake_cloud::AssetBytes;
use intake_core::registration::{RegistrationForm, SCREENSHOT_FIELD};

use crate::error::AppError;
use crate::state::AppState;

/// A parsed registration request.
#[derive(Debug)]
pub struct Submission {
    pub form: RegistrationForm,
    /// The attached payment screenshot. A file part with no bytes counts
    /// as not attached.
    pub screenshot: Option<AssetBytes>,
}

impl FromRequest<AppState> for Submission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(form) = Json::<RegistrationForm>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                form,
                screenshot: None,
            })
        } else {
            Err(AppError::BadRequest(
                "Expected a multipart/form-data or application/json body".into(),
            ))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut form = RegistrationForm::default();
    let mut screenshot: Option<AssetBytes> = None;
    let mut screenshot_parts = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == SCREENSHOT_FIELD {
            screenshot_parts += 1;
            if screenshot_parts > 1 {
                return Err(AppError::BadRequest(format!(
                    "Only one '{SCREENSHOT_FIELD}' file may be attached"
                )));
            }

            let file_name = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .map(str::to_string)
                .or_else(|| {
                    file_name
                        .as_deref()
                        .map(|f| content_type_for_path(std::path::Path::new(f)).to_string())
                })
                .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;

            if !data.is_empty() {
                screenshot = Some(AssetBytes {
                    data: data.to_vec(),
                    content_type,
                    file_name,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if !form.set_field(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok(Submission { form, screenshot })
}
