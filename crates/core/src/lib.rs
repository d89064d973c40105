//! Domain types and rules for registration intake.
//!
//! Nothing here touches the network or the database: the registration
//! form shape, the presence-only validation rule and the typed draft the
//! persistence layer consumes.

pub mod error;
pub mod registration;
pub mod types;
