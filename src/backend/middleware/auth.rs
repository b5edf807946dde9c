/**
 * Access Gate
 *
 * Resolves the `Authorization: Bearer <token>` header to a live user and
 * checks poem ownership.
 *
 * There is no session state: every request verifies the token and looks the
 * user up again, so a token naming a user that no longer exists is rejected.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{Poem, User};

const NOT_AUTHENTICATED: &str = "Authentication required";

/// Extractor for the authenticated user
///
/// Handlers that take `AuthUser` only run for requests carrying a valid
/// token of an existing user; anything else is answered with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                BackendError::unauthenticated(NOT_AUTHENTICATED)
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            BackendError::unauthenticated(NOT_AUTHENTICATED)
        })?;

        let user_id = state.tokens.user_id_from_token(token).map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            BackendError::unauthenticated("Invalid token")
        })?;

        let user = state.store.find_user_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!("Token names unknown user {}", user_id);
            BackendError::unauthenticated("Invalid token")
        })?;

        Ok(AuthUser(user))
    }
}

/// Fail with `Unauthorized` unless `user` wrote `poem`.
///
/// `action` names the attempted change for the client message, e.g. "edit".
pub fn ensure_owner(user: &User, poem: &Poem, action: &str) -> Result<(), BackendError> {
    if poem.author_id == user.id {
        Ok(())
    } else {
        tracing::warn!(
            "User {} attempted to {} poem {} owned by {}",
            user.id,
            action,
            poem.id,
            poem.author_id
        );
        Err(BackendError::unauthorized(format!(
            "You cannot {action} someone else's poem"
        )))
    }
}
