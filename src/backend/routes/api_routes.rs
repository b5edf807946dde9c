/**
 * API Route Handlers
 *
 * Adds every `/api` endpoint to the router.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Get current user info (requires authentication)
 *
 * ## Poems
 * - `GET /api/poems`, `POST /api/poems` (authenticated)
 * - `GET /api/poems/{id}`, `PUT` and `DELETE` (author only)
 * - `POST /api/poems/{id}/read` (authenticated)
 * - `GET /api/poems/user/{user_id}`
 *
 * ## Users
 * - `GET /api/users`, `GET /api/users/{id}`
 * - `GET /api/users/top/authors?limit=N`
 *
 * ## Service
 * - `GET /api/health` - Liveness and store backend
 *
 * Any other `/api` path answers with a JSON 404 instead of falling through
 * to the static client.
 */

use axum::{
    extract::State,
    response::Json,
    routing::{any, get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::{get_me, login, register};
use crate::backend::error::BackendError;
use crate::backend::poems::{
    create_poem, delete_poem, get_poem, list_poems, list_user_poems, read_poem, update_poem,
};
use crate::backend::server::state::AppState;
use crate::backend::store::SharedStore;
use crate::backend::users::{get_user, list_users, top_authors};

/// Body of `GET /api/health`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    /// Active store backend (`postgres` or `memory`)
    pub store: String,
}

async fn health(State(store): State<SharedStore>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        store: store.backend_name().to_string(),
    })
}

async fn api_not_found() -> BackendError {
    BackendError::not_found("Route not found")
}

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/health", get(health))
        // Authentication endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me))
        // Poem endpoints
        .route("/api/poems", get(list_poems).post(create_poem))
        .route(
            "/api/poems/{id}",
            get(get_poem).put(update_poem).delete(delete_poem),
        )
        .route("/api/poems/{id}/read", post(read_poem))
        .route("/api/poems/user/{user_id}", get(list_user_poems))
        // User directory endpoints
        .route("/api/users", get(list_users))
        .route("/api/users/top/authors", get(top_authors))
        .route("/api/users/{id}", get(get_user))
        .route("/api/{*rest}", any(api_not_found))
}
