#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A submission was rejected by a presence rule. The message is shown
    /// to the client verbatim.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A submitted value could not be converted to its stored type.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
