//! Route definitions for registration intake.
//!
//! ```text
//! POST /register                                   register
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::registration;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(registration::register))
}
