/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - The store (`SharedStore`), PostgreSQL or in-memory
 * - The popularity ledger, which wraps the same store
 * - Token keys derived from the JWT secret
 * - The server configuration
 *
 * Everything is behind `Arc`, so cloning the state per request is cheap.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use stanza::backend::store::SharedStore;
 *
 * async fn handler(State(store): State<SharedStore>) {
 *     let _backend = store.backend_name();
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::ledger::PopularityLedger;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::SharedStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// User and poem persistence
    pub store: SharedStore,
    /// Ledger transitions over `store`
    pub ledger: PopularityLedger,
    /// JWT signing and verification keys
    pub tokens: Arc<TokenKeys>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state around a store.
    pub fn new(store: SharedStore, config: ServerConfig) -> Self {
        Self {
            ledger: PopularityLedger::new(store.clone()),
            tokens: Arc::new(TokenKeys::from_secret(&config.jwt_secret)),
            config: Arc::new(config),
            store,
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for PopularityLedger {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ledger.clone()
    }
}
