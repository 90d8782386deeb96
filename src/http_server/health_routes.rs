//! Health HTTP Routes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::posts::{ApiResult, PostService};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub posts: usize,
}

/// Health check route at `/health`
pub fn health_routes(service: Arc<PostService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(service)
}

async fn health_handler(
    State(service): State<Arc<PostService>>,
) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        posts: service.count()?,
    }))
}
