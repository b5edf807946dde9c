/**
 * Server Initialization
 *
 * Store selection and app creation.
 *
 * # Store Selection
 *
 * - `DATABASE_URL` set: connect to PostgreSQL and run migrations. A failure
 *   here aborts startup; serving from an empty in-memory store instead would
 *   silently lose writes.
 * - `DATABASE_URL` unset: in-memory store, with a warning that nothing
 *   survives a restart.
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{ConfigError, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PostgresStore, SharedStore, StoreError};

/// Startup errors
#[derive(Debug, Error)]
pub enum InitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the store the configuration asks for.
pub async fn load_store(config: &ServerConfig) -> Result<SharedStore, InitError> {
    let store: SharedStore = match &config.database_url {
        Some(url) => Arc::new(PostgresStore::connect(url, config.max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!("Store backend: {}", store.backend_name());
    Ok(store)
}

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing stanza backend server");

    let store = load_store(&config).await?;
    let app_state = AppState::new(store, config);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}
