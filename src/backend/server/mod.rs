//! Server Module
//!
//! Everything needed to turn a configuration into a running Axum app.
//!
//! - **`config`** - `ServerConfig` and its environment loader
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`init`** - store selection and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `ServerConfig::from_env()`
//! 2. **Store**: PostgreSQL (with migrations) when `DATABASE_URL` is set,
//!    in-memory otherwise
//! 3. **State**: store, ledger, token keys
//! 4. **Router**: API routes, static fallback, CORS and tracing layers

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{create_app, load_store, InitError};
pub use state::AppState;
