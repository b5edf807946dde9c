/**
 * Get Current User Handler
 *
 * GET /api/auth/me returns the user the bearer token belongs to. The
 * `AuthUser` extractor does the work; by the time the handler runs the
 * user is known to exist.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::MeResponse;
use crate::backend::middleware::AuthUser;
use crate::shared::PublicUser;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - If the token is missing, invalid or names no user
pub async fn get_me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    tracing::debug!("Returning current user {}", user.id);
    Json(MeResponse {
        user: PublicUser::from(&user),
    })
}
