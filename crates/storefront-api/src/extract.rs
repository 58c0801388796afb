//! `Json`/`Query` wrappers whose rejections use the API's `{"error": ...}`
//! body instead of axum's plain-text default.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
