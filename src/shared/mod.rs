//! Shared Module
//!
//! Types that cross the HTTP boundary. Everything here is plain serde data so
//! a client crate can depend on it without pulling in the server stack.

/// Shared error types
pub mod error;

/// Public user profile views
pub mod user;

/// Poem views and drafts
pub mod poem;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use poem::{PoemDraft, PoemView, ReadResponse};
pub use user::{AuthorSummary, PublicUser, UserProfile};
