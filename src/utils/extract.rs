use axum::extract::FromRequest;

use crate::data::models::ApiError;

/// `axum::Json` whose rejections render as [`ApiError::InvalidInput`]
/// instead of axum's plain-text 4xx responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
