//! Poems Module
//!
//! HTTP surface over the content store and the popularity ledger.
//!
//! # Endpoints
//!
//! | Method | Path                      | Auth         |
//! |--------|---------------------------|--------------|
//! | GET    | /api/poems                | none         |
//! | GET    | /api/poems/{id}           | none         |
//! | POST   | /api/poems                | token        |
//! | PUT    | /api/poems/{id}           | token, owner |
//! | DELETE | /api/poems/{id}           | token, owner |
//! | POST   | /api/poems/{id}/read      | token        |
//! | GET    | /api/poems/user/{user_id} | none         |

pub mod handlers;

pub use handlers::{
    create_poem, delete_poem, get_poem, list_poems, list_user_poems, read_poem, update_poem,
    DeletedResponse,
};
