//! Public user views.
//!
//! Three projections of a user record, none of which carries the password
//! hash: the auth payload, the author card embedded in poems, and the full
//! directory profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User as returned by register, login and `/api/auth/me`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_color: String,
    pub popularity: i64,
}

/// Author card embedded in poem responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_color: String,
    pub popularity: i64,
}

/// Directory entry for `/api/users` and friends.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birthdate: NaiveDate,
    pub bio: String,
    pub avatar_color: String,
    pub popularity: i64,
    pub registered_at: DateTime<Utc>,
    /// Number of poems the user currently has
    pub poems_count: i64,
}
