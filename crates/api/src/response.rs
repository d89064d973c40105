//! Shared response body types for API handlers.
//!
//! Every response from the intake endpoint, success or failure, is a
//! `{ "message": ... }` object.

use serde::Serialize;

/// Message returned with a 201 after a registration is stored.
pub const MSG_REGISTRATION_SUCCESSFUL: &str = "Registration successful";

/// Message returned with every 500. The cause is logged, never sent.
pub const MSG_SERVER_ERROR: &str = "Server error";

/// Standard `{ "message": String }` response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
