use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use tracing::error;

use crate::directory::DirectoryCache;

// axum handler for the employee directory
pub async fn employees(Extension(cache): Extension<Arc<DirectoryCache>>) -> Response {
    match cache.get().await {
        Ok(payload) => ([(CONTENT_TYPE, "application/json")], payload).into_response(),
        Err(e) => {
            error!("employee directory refresh failed: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")).into_response()
        }
    }
}
