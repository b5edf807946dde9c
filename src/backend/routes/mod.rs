//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! - **`router`** - Main router creation, layers and the static fallback
//! - **`api_routes`** - `/api` endpoints (auth, poems, users, health)
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint handlers
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use stanza::backend::routes::create_router;
//! use stanza::backend::server::{config::ServerConfig, AppState};
//! use stanza::backend::store::MemoryStore;
//!
//! let state = AppState::new(Arc::new(MemoryStore::new()), ServerConfig::default());
//! let app = create_router(state);
//! ```

pub mod router;
pub mod api_routes;

pub use api_routes::{configure_api_routes, HealthResponse};
pub use router::create_router;
