//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Client input was rejected; the payload is a short error code.
  #[error("bad request: {0}")]
  BadRequest(&'static str),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<storefront_core::Error> for ApiError {
  fn from(e: storefront_core::Error) -> Self { Self::BadRequest(e.code()) }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self {
    tracing::debug!(error = %e, "rejected request body");
    Self::BadRequest("invalid_json")
  }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self {
    tracing::debug!(error = %e, "rejected query string");
    Self::BadRequest("invalid_query")
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = match &self {
      ApiError::BadRequest(code) => (StatusCode::BAD_REQUEST, *code),
      ApiError::Store(e) => {
        // The detail stays in the log; clients only learn that the query
        // failed.
        tracing::error!(error = %e, "store query failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "db_error")
      }
    };
    (status, Json(json!({ "error": code }))).into_response()
  }
}
