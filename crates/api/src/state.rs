use std::sync::Arc;

use carousel_gateway::AiGateway;
use carousel_storage::StorageProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or already `Clone`. The
/// gateway and storage sit behind trait objects so tests can swap in
/// scripted fakes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: carousel_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// AI gateway client (text and image models).
    pub gateway: Arc<dyn AiGateway>,
    /// Object storage for generated artwork.
    pub storage: Arc<dyn StorageProvider>,
}
