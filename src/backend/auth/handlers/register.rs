/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate name, email, password and birthdate
 * 2. Hash password using bcrypt
 * 3. Pick an avatar color from the palette
 * 4. Create the user (duplicate email is rejected by the store)
 * 5. Generate JWT token
 * 6. Return token and user info with 201
 *
 * # Validation
 *
 * - Name is required (trimmed)
 * - Email is lower-cased and trimmed, must contain '@' and be unique
 * - Password must be at least 6 characters
 * - Birthdate is required and cannot be in the future
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use rand::seq::SliceRandom;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest, AVATAR_PALETTE};
use crate::backend::auth::passwords::hash_password;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{NewUser, StoreError};
use crate::shared::PublicUser;

fn random_avatar_color() -> String {
    AVATAR_PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(AVATAR_PALETTE[0])
        .to_string()
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - If a field is missing or invalid, or the email is taken
/// * `500 Internal Server Error` - If hashing, storage or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "name": "Anna",
///   "email": "anna@example.com",
///   "password": "secret1",
///   "birthdate": "1989-06-23"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let Json(request) = payload?;
    let registration = request.validate(Utc::now().date_naive()).map_err(|e| {
        tracing::warn!("Rejected registration: {}", e);
        e
    })?;
    tracing::info!("Register request for email: {}", registration.email);

    let password_hash = hash_password(registration.password, state.config.bcrypt_cost).await?;

    let user = state
        .store
        .create_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            birthdate: registration.birthdate,
            bio: registration.bio,
            avatar_color: random_avatar_color(),
        })
        .await
        .map_err(|e| {
            match &e {
                StoreError::DuplicateEmail => tracing::warn!("Email already registered"),
                other => tracing::error!("Failed to create user: {:?}", other),
            }
            e
        })?;

    let token = state
        .tokens
        .create_token(user.id)
        .map_err(|e| BackendError::internal("Failed to create token", e))?;

    tracing::info!("User created successfully: {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}
