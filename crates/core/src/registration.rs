//! Registration form shape, presence validation and typed conversion.
//!
//! A submission arrives as loosely-typed text fields. [`validate_submission`]
//! decides accept/reject on presence alone; [`RegistrationDraft::from_form`]
//! then converts the accepted values into the types that get stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The only payment mode that requires an amount and a payment screenshot.
pub const PAYMENT_MODE_ONLINE: &str = "online";

/// Rejection message when any unconditionally-required field is missing.
pub const MSG_ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Rejection message when an online payment lacks its amount or screenshot.
pub const MSG_ONLINE_PAYMENT_INCOMPLETE: &str =
    "Payment amount and screenshot are required for online payment";

/// Asset-store folder that payment screenshots are uploaded into.
pub const DEFAULT_UPLOAD_FOLDER: &str = "mandir_upload";

/// Name of the multipart file field carrying the payment screenshot.
pub const SCREENSHOT_FIELD: &str = "paymentScreenshot";

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw submitted values, exactly as received. Every field is optional here;
/// presence is decided by [`validate_submission`].
///
/// Deserializes from the camelCase JSON body. Numbers are accepted wherever
/// text is expected; `0`, `false` and `null` count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub father_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub membership: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub payment_mode: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub amount: Option<String>,
}

impl RegistrationForm {
    /// Assign a multipart text field by its wire name.
    ///
    /// Returns `false` for names that are not part of the form; callers
    /// ignore those.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "fatherName" => &mut self.father_name,
            "age" => &mut self.age,
            "dob" => &mut self.dob,
            "mobile" => &mut self.mobile,
            "email" => &mut self.email,
            "address" => &mut self.address,
            "membership" => &mut self.membership,
            "date" => &mut self.date,
            "paymentMode" => &mut self.payment_mode,
            "amount" => &mut self.amount,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Whether the payment mode is exactly `"online"`.
    pub fn is_online_payment(&self) -> bool {
        self.payment_mode.as_deref() == Some(PAYMENT_MODE_ONLINE)
    }

    /// Fields that must always be present, in form order.
    fn required_fields(&self) -> [&Option<String>; 10] {
        [
            &self.name,
            &self.father_name,
            &self.age,
            &self.dob,
            &self.mobile,
            &self.email,
            &self.address,
            &self.membership,
            &self.date,
            &self.payment_mode,
        ]
    }
}

/// Accept a JSON string or number as text. Falsy values (`0`, `false`,
/// `null`) become `None`.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Decide whether a submission may proceed.
///
/// Presence only: no format, type or range checks. Payment modes other than
/// exactly `"online"` never require an amount or a screenshot.
pub fn validate_submission(form: &RegistrationForm, has_screenshot: bool) -> Result<(), CoreError> {
    if !form.required_fields().into_iter().all(is_present) {
        return Err(CoreError::Validation(MSG_ALL_FIELDS_REQUIRED.to_string()));
    }

    if form.is_online_payment() && !(is_present(&form.amount) && has_screenshot) {
        return Err(CoreError::Validation(
            MSG_ONLINE_PAYMENT_INCOMPLETE.to_string(),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Typed draft
// ---------------------------------------------------------------------------

/// A validated submission converted to stored types, minus the payment
/// proof URL (which only exists after an upload).
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    pub name: String,
    pub father_name: String,
    pub age: i32,
    pub dob: Timestamp,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub membership: String,
    pub date: Timestamp,
    pub payment_mode: String,
    pub amount: Option<f64>,
}

impl RegistrationDraft {
    /// Convert a form that already passed [`validate_submission`].
    ///
    /// Missing required values here indicate a caller bug and surface as
    /// [`CoreError::Internal`]; unparseable values as
    /// [`CoreError::InvalidValue`].
    pub fn from_form(form: &RegistrationForm) -> Result<Self, CoreError> {
        Ok(Self {
            name: required(&form.name, "name")?.to_string(),
            father_name: required(&form.father_name, "fatherName")?.to_string(),
            age: parse_age(required(&form.age, "age")?)?,
            dob: parse_date("dob", required(&form.dob, "dob")?)?,
            mobile: required(&form.mobile, "mobile")?.to_string(),
            email: required(&form.email, "email")?.to_string(),
            address: required(&form.address, "address")?.to_string(),
            membership: required(&form.membership, "membership")?.to_string(),
            date: parse_date("date", required(&form.date, "date")?)?,
            payment_mode: required(&form.payment_mode, "paymentMode")?.to_string(),
            amount: parse_amount(form.amount.as_deref())?,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, CoreError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Internal(format!("'{field}' missing after validation")))
}

fn parse_age(value: &str) -> Result<i32, CoreError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|e| CoreError::InvalidValue {
            field: "age",
            reason: e.to_string(),
        })
}

/// Parse `YYYY-MM-DD` (as midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(field: &'static str, value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();

    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::InvalidValue {
            field,
            reason: format!("'{value}' is not a date (expected YYYY-MM-DD or RFC 3339)"),
        })
}

fn parse_amount(value: Option<&str>) -> Result<Option<f64>, CoreError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        Ok(_) => Err(CoreError::InvalidValue {
            field: "amount",
            reason: "must be a finite number".to_string(),
        }),
        Err(e) => Err(CoreError::InvalidValue {
            field: "amount",
            reason: e.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
