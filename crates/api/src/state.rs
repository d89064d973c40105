use std::sync::Arc;

use intake_cloud::AssetUploader;
use intake_db::store::RegistrationStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once at start-up and cheaply cloneable; nothing in it is mutated
/// per request.
#[derive(Clone)]
pub struct AppState {
    /// Where registrations are persisted.
    pub store: Arc<dyn RegistrationStore>,
    /// Where payment screenshots are uploaded.
    pub uploader: Arc<dyn AssetUploader>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
