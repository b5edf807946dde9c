/**
 * User Directory Handlers
 *
 * Read-only views over users, each with the number of poems they have.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::{parse_id, BackendError};
use crate::backend::store::{SharedStore, User, UserListQuery};
use crate::shared::UserProfile;

pub const USER_NOT_FOUND: &str = "User not found";
pub const DEFAULT_TOP_AUTHORS: i64 = 5;

/// Query string of `GET /api/users/top/authors`
///
/// `limit` is kept as text so that garbage falls back to the default
/// instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopAuthorsQuery {
    pub limit: Option<String>,
}

impl TopAuthorsQuery {
    /// Requested limit; missing, non-numeric or non-positive means 5.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_TOP_AUTHORS)
    }
}

async fn profiles(store: &SharedStore, users: Vec<User>) -> Result<Vec<UserProfile>, BackendError> {
    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        let poems_count = store.count_poems_by_author(user.id).await?;
        profiles.push(user.profile(poems_count));
    }
    Ok(profiles)
}

/// GET /api/users
///
/// Everyone, most popular first.
pub async fn list_users(State(store): State<SharedStore>) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let users = store.list_users(UserListQuery::all()).await?;
    Ok(Json(profiles(&store, users).await?))
}

/// GET /api/users/:id
pub async fn get_user(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, BackendError> {
    let id = parse_id(&id, "User")?;
    let user = store
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found(USER_NOT_FOUND))?;

    let poems_count = store.count_poems_by_author(user.id).await?;
    Ok(Json(user.profile(poems_count)))
}

/// GET /api/users/top/authors?limit=N
///
/// The N most popular users with at least one reader.
pub async fn top_authors(
    State(store): State<SharedStore>,
    Query(query): Query<TopAuthorsQuery>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let limit = query.limit();
    let users = store.list_users(UserListQuery::top_authors(limit)).await?;
    tracing::debug!("Top {} authors requested, {} returned", limit, users.len());
    Ok(Json(profiles(&store, users).await?))
}
