//! Request validation endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqshape_core::{ValidateError, Value};
use serde_json::json;
use tracing::debug;

use super::AppState;

/// Handles `POST /validate`: checks a request description against the
/// learned model for its target (path, method).
///
/// Status mapping:
/// - 200 with the verdict when a model exists and the description is walkable
/// - 404 when no model was learned for the target
/// - 400 when the target or the description is malformed
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(description): Json<Value>,
) -> Response {
    let _guard = state.shutdown.in_flight_guard();

    let Some(target) = description.as_map() else {
        return error_response(StatusCode::BAD_REQUEST, "request description is not an object");
    };
    let (Some(path), Some(method)) = (
        target.get("path").and_then(Value::as_str),
        target.get("method").and_then(Value::as_str),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "`path` and `method` must be strings");
    };

    match state.engine.validate_request(path, method, &description) {
        Ok(verdict) => {
            debug!(method, path, valid = verdict.valid, "validated request");
            (StatusCode::OK, Json(verdict)).into_response()
        }
        Err(error @ ValidateError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, &error.to_string())
        }
        Err(error @ ValidateError::MalformedRequest(_)) => {
            error_response(StatusCode::BAD_REQUEST, &error.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}
