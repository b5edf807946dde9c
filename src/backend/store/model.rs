/**
 * Stored Records
 *
 * The user and poem records as the stores keep them, the inputs used to
 * create them, and their projections onto the shared wire types.
 */

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::{AuthorSummary, PoemView, PublicUser, UserProfile};

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email, lower-cased and trimmed; unique
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub birthdate: NaiveDate,
    pub bio: String,
    /// Hex color used for the avatar
    pub avatar_color: String,
    /// Distinct readers across all of this user's poems
    pub popularity: i64,
    pub registered_at: DateTime<Utc>,
}

/// Input for [`IdentityStore::create_user`](super::IdentityStore::create_user)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub birthdate: NaiveDate,
    pub bio: String,
    pub avatar_color: String,
}

impl NewUser {
    /// Materialize the record with a fresh id, zero popularity and the
    /// current time.
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            birthdate: self.birthdate,
            bio: self.bio,
            avatar_color: self.avatar_color,
            popularity: 0,
            registered_at: Utc::now(),
        }
    }
}

/// Poem record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Owning user
    pub author_id: Uuid,
    /// Author name as it was when the poem was created
    pub author_name: String,
    /// Always equal to `distinct_readers.len()`
    pub read_count: i64,
    pub distinct_readers: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`ContentStore::create_poem`](super::ContentStore::create_poem)
///
/// Built by the ledger, which owns the starting state of a poem.
#[derive(Debug, Clone)]
pub struct NewPoem {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
}

impl NewPoem {
    /// Materialize the record: no readers yet, both timestamps now.
    pub fn into_poem(self) -> Poem {
        let now = Utc::now();
        Poem {
            id: Uuid::new_v4(),
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            author_name: self.author_name,
            read_count: 0,
            distinct_readers: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter for [`IdentityStore::list_users`](super::IdentityStore::list_users)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserListQuery {
    /// Keep only users whose popularity is strictly greater than this
    pub popularity_above: Option<i64>,
    /// Maximum number of users
    pub limit: Option<i64>,
}

impl UserListQuery {
    /// Everyone.
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` most popular users with positive popularity.
    pub fn top_authors(limit: i64) -> Self {
        Self {
            popularity_above: Some(0),
            limit: Some(limit),
        }
    }

    /// Whether a user passes the popularity filter.
    pub fn admits(&self, user: &User) -> bool {
        self.popularity_above
            .map_or(true, |floor| user.popularity > floor)
    }
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_color: user.avatar_color.clone(),
            popularity: user.popularity,
        }
    }
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar_color: user.avatar_color.clone(),
            popularity: user.popularity,
        }
    }
}

impl User {
    /// Directory profile with the given poem count.
    pub fn profile(&self, poems_count: i64) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            birthdate: self.birthdate,
            bio: self.bio.clone(),
            avatar_color: self.avatar_color.clone(),
            popularity: self.popularity,
            registered_at: self.registered_at,
            poems_count,
        }
    }
}

impl Poem {
    /// API view with an optional live author card.
    pub fn view(&self, author: Option<AuthorSummary>) -> PoemView {
        PoemView {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author_id: self.author_id,
            author_name: self.author_name.clone(),
            author,
            read_count: self.read_count,
            distinct_readers: self.distinct_readers.iter().copied().collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
