//! Registration entity model and DTOs.

use intake_core::registration::RegistrationDraft;
use intake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
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
    /// Asset-store URL of the payment screenshot, if one was uploaded.
    pub payment_screenshot: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new registration. `created_at` is set by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRegistration {
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
    pub payment_screenshot: Option<String>,
}

impl CreateRegistration {
    /// Attach the uploaded screenshot URL (if any) to a converted draft.
    pub fn from_draft(draft: RegistrationDraft, payment_screenshot: Option<String>) -> Self {
        let RegistrationDraft {
            name,
            father_name,
            age,
            dob,
            mobile,
            email,
            address,
            membership,
            date,
            payment_mode,
            amount,
        } = draft;

        Self {
            name,
            father_name,
            age,
            dob,
            mobile,
            email,
            address,
            membership,
            date,
            payment_mode,
            amount,
            payment_screenshot,
        }
    }
}
