/**
 * Error Conversion
 *
 * Turns `BackendError` into an HTTP response and maps Axum extractor
 * rejections onto the same taxonomy.
 *
 * # Response Format
 *
 * ```json
 * { "message": "Poem not found" }
 * ```
 */

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::backend::error::types::BackendError;
use crate::shared::SharedError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = serde_json::json!({ "message": self.message() });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        SharedError::malformed(rejection.body_text()).into()
    }
}

/// Parse an id taken from the request path.
///
/// A string that is not a UUID cannot name any record, so it is reported as
/// not found rather than as bad input.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        tracing::debug!("Rejecting malformed {} id: {}", what, raw);
        BackendError::not_found(format!("{what} not found"))
    })
}
