//! Middleware Module
//!
//! Request-side checks shared by the handlers.
//!
//! - **`auth`** - the access gate: the `AuthUser` extractor, which resolves a
//!   bearer token to a live user, and the poem ownership check
//!
//! # Example
//!
//! ```rust,no_run
//! use stanza::backend::middleware::AuthUser;
//!
//! async fn handler(AuthUser(user): AuthUser) -> String {
//!     user.name
//! }
//! ```

pub mod auth;

pub use auth::{ensure_owner, AuthUser};
