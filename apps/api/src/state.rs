use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::cv::CvServices;
use crate::store::Store;
use crate::ws::WsManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-mostly listings (jobs, survey, catalog) query the pool directly.
    pub db: PgPool,
    pub config: Config,
    pub store: Arc<dyn Store>,
    /// CV lifecycle collaborators. Shares `store` with the field above.
    pub cv: CvServices,
    pub ws_manager: Arc<WsManager>,
}
