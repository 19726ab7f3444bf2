use std::sync::Arc;

use crate::config::ServerConfig;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: cytomine_db::DbPool,
    pub config: Arc<ServerConfig>,
}
