//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Rendered as `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Classify a core or store failure raised while trying to `action`
  /// (e.g. `"save resource"`). Input validation errors map to 400.
  pub fn classify(err: impl Into<saver_core::Error>, action: &str) -> Self {
    use saver_core::Error as E;

    let err: E = err.into();
    match err {
      E::Conflict { .. } => {
        ApiError::Conflict("Resource with this URL already exists".to_owned())
      }
      e @ E::IdTaken(_) => ApiError::Conflict(e.to_string()),
      e @ (E::EmptyField(_) | E::InvalidTimestamp(_)) => {
        ApiError::BadRequest(e.to_string())
      }
      e @ (E::NotFoundAfterWrite { .. } | E::Backend(_)) => {
        tracing::error!(error = %e, "failed to {action}");
        ApiError::Internal(format!("Failed to {action}: {e}"))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
    };
    (status, Json(json!({ "detail": message }))).into_response()
  }
}
