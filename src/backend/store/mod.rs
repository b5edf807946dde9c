//! Store Module
//!
//! Persistence for users and poems behind three traits:
//!
//! - [`IdentityStore`] - user records and the popularity counter
//! - [`ContentStore`] - poem records
//! - [`LedgerStore`] - the two cross-entity transitions of the popularity
//!   ledger, each of which must run atomically
//!
//! A backend implements all three and is used through [`SharedStore`].
//!
//! # Backends
//!
//! - **`postgres`** - sqlx/PostgreSQL, used when `DATABASE_URL` is set
//! - **`memory`** - a single `RwLock` over two maps, used in tests and when
//!   no database is configured

/// Stored records and inputs
pub mod model;

/// In-memory backend
pub mod memory;

/// PostgreSQL backend
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::ledger::{Deletion, ReadReceipt};

pub use memory::MemoryStore;
pub use model::{NewPoem, NewUser, Poem, User, UserListQuery};
pub use postgres::PostgresStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another user already registered this email
    #[error("email already registered")]
    DuplicateEmail,

    /// The poem a transition targets does not exist
    #[error("poem {0} not found")]
    PoemNotFound(Uuid),

    /// A poem references an author that cannot be resolved
    #[error("author {0} of a poem could not be resolved")]
    MissingAuthor(Uuid),

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::DuplicateEmail`] if the
    /// (already normalized) email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Look a user up by normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Look a user up by id.
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Add `delta` to a user's popularity, flooring at zero.
    async fn apply_popularity_delta(
        &self,
        id: Uuid,
        delta: i64,
    ) -> Result<Option<User>, StoreError>;

    /// Users ordered by popularity (highest first, earliest registration
    /// breaking ties), filtered and truncated by `query`.
    async fn list_users(&self, query: UserListQuery) -> Result<Vec<User>, StoreError>;
}

/// Poem records.
///
/// None of these check ownership; the access gate does that before calling.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a poem.
    async fn create_poem(&self, poem: NewPoem) -> Result<Poem, StoreError>;

    /// Look a poem up by id.
    async fn get_poem(&self, id: Uuid) -> Result<Option<Poem>, StoreError>;

    /// Replace title and content, bumping `updated_at`.
    async fn update_poem(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Poem>, StoreError>;

    /// Delete a poem without touching popularity. Returns whether it existed.
    ///
    /// Author-facing deletion goes through
    /// [`LedgerStore::remove_poem_and_release`] instead.
    async fn delete_poem(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Poems newest first, optionally restricted to one author.
    async fn list_poems(&self, author: Option<Uuid>) -> Result<Vec<Poem>, StoreError>;

    /// Number of poems by one author.
    async fn count_poems_by_author(&self, author: Uuid) -> Result<i64, StoreError>;
}

/// Atomic ledger transitions.
///
/// Each method touches a poem and its author and must be all-or-nothing: if
/// the author cannot be resolved the poem is left untouched and
/// [`StoreError::MissingAuthor`] is returned.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Add `reader_id` to the poem's distinct readers if absent, bumping the
    /// poem's read count and the author's popularity together.
    async fn record_read(&self, poem_id: Uuid, reader_id: Uuid)
        -> Result<ReadReceipt, StoreError>;

    /// Subtract the poem's read count from its author's popularity, then
    /// delete the poem.
    async fn remove_poem_and_release(&self, poem_id: Uuid) -> Result<Deletion, StoreError>;
}

/// A complete store backend.
pub trait Store: IdentityStore + ContentStore + LedgerStore {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

/// The store as held by application state.
pub type SharedStore = Arc<dyn Store>;
