/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by normalized email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * An unknown email and a wrong password get the same 400 answer, so the
 * endpoint does not reveal which emails are registered.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{normalize_email, AuthResponse, LoginRequest};
use crate::backend::auth::passwords::verify_password;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::error::required_text;
use crate::shared::PublicUser;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing fields, unknown email or wrong password
/// * `500 Internal Server Error` - If the store, bcrypt or token signing fails
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BackendError> {
    let Json(request) = payload?;
    let email = normalize_email(request.email.as_deref())?;
    // Only presence is checked here; whitespace is part of the password.
    required_text("password", request.password.as_deref())?;
    let password = request.password.unwrap_or_default();

    tracing::info!("Login request for email: {}", email);

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed: unknown email {}", email);
            BackendError::validation(INVALID_CREDENTIALS)
        })?;

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::warn!("Login failed: wrong password for {}", user.id);
        return Err(BackendError::validation(INVALID_CREDENTIALS));
    }

    let token = state
        .tokens
        .create_token(user.id)
        .map_err(|e| BackendError::internal("Failed to create token", e))?;

    tracing::info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}
