//! Backend Module
//!
//! All server-side code for Stanza: the Axum HTTP server, authentication,
//! the identity/content stores and the popularity ledger.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly
//! - **`auth`** - Registration, login, JWT sessions
//! - **`middleware`** - The access gate (`AuthUser` extractor, ownership check)
//! - **`store`** - Identity and content stores (PostgreSQL, in-memory)
//! - **`ledger`** - Popularity bookkeeping for reads and deletions
//! - **`poems`** - Poem handlers
//! - **`users`** - User directory handlers
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Config, state, initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Access gate
//! ├── store/          - Persistence
//! ├── ledger/         - Popularity ledger
//! ├── poems/          - Poem endpoints
//! ├── users/          - User endpoints
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! `AppState` is cheap to clone: the store sits behind an `Arc<dyn Store>`,
//! and both store implementations are `Send + Sync`. The database pool and
//! the in-memory `RwLock` provide all synchronization; handlers hold no
//! state of their own.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Identity and content persistence
pub mod store;

/// Popularity bookkeeping
pub mod ledger;

/// Poem endpoints
pub mod poems;

/// User directory endpoints
pub mod users;

/// Re-export commonly used types
pub use error::BackendError;
pub use ledger::PopularityLedger;
pub use server::{create_app, AppState};
