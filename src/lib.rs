//! Stanza - Main Library
//!
//! Stanza is a small poetry-sharing backend built on Axum. Users register,
//! publish poems, read each other's poems, and collect a popularity score
//! equal to the number of distinct readers across everything they wrote.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types shared with clients
//!   - Poem and profile views
//!   - Field validation errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum router, handlers and error mapping
//!   - JWT authentication and the access gate
//!   - Identity/content stores (PostgreSQL and in-memory)
//!   - The popularity ledger
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend modules and the `stanza-server` binary.
//!   On by default.
//!
//! # Usage
//!
//! ```rust,no_run
//! use stanza::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Popularity
//!
//! A user's `popularity` always equals the sum of distinct readers over their
//! existing poems. It is maintained incrementally by
//! [`backend::ledger::PopularityLedger`]; every transition runs atomically
//! inside the selected store.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
