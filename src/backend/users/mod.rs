//! Users Module
//!
//! Public user directory: everyone, one user, and the top authors by
//! popularity. Registration lives in `auth`.

pub mod handlers;

pub use handlers::{get_user, list_users, top_authors, TopAuthorsQuery};
