//! Posts HTTP Routes
//!
//! Maps the `/posts` routes onto `PostService`. Mutating routes validate
//! their payload first; any validation or lookup failure is returned as an
//! `ApiError` and translated into a response in one place.

use std::fmt;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};

use super::payload::Payload;
use crate::posts::{
    validate_create, validate_patch, validate_replace, ApiError, ApiResult, Post, PostService,
};

// ==================
// Route Ids
// ==================

/// A `:id` path segment, parsed with leading-integer rules.
///
/// Surrounding whitespace and a sign are allowed and anything after the
/// leading digits is ignored, so `"12abc"` is 12. A segment without leading
/// digits is `NaN`. Only positive ids that fit in a `u64` can address a
/// post; every other value renders into a not-found error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteId {
    id: Option<u64>,
    rendered: String,
}

impl RouteId {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..end];
        if digits.is_empty() {
            return Self {
                id: None,
                rendered: "NaN".to_string(),
            };
        }

        let magnitude = match digits.trim_start_matches('0') {
            "" => "0",
            m => m,
        };
        let rendered = if negative && magnitude != "0" {
            format!("-{}", magnitude)
        } else {
            magnitude.to_string()
        };
        let id = if negative {
            None
        } else {
            magnitude.parse::<u64>().ok().filter(|&n| n > 0)
        };

        Self { id, rendered }
    }

    /// The post id this segment addresses, or the not-found error for it.
    pub fn resolve(&self) -> ApiResult<u64> {
        self.id.ok_or_else(|| ApiError::not_found(self))
    }
}

/// Segments that fail to decode (e.g. percent-encoded invalid UTF-8) are
/// rejected as `MalformedPath`.
#[async_trait]
impl<S> FromRequestParts<S> for RouteId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::MalformedPath(e.body_text()))?;
        Ok(Self::parse(&raw))
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

// ==================
// Posts Routes
// ==================

/// Create posts routes
pub fn posts_routes(service: Arc<PostService>) -> Router {
    Router::new()
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route(
            "/posts/:id",
            get(get_post_handler)
                .delete(delete_post_handler)
                .put(replace_post_handler)
                .patch(patch_post_handler),
        )
        .with_state(service)
}

async fn list_posts_handler(
    State(service): State<Arc<PostService>>,
) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(service.list()?))
}

async fn get_post_handler(
    State(service): State<Arc<PostService>>,
    route_id: RouteId,
) -> ApiResult<Json<Post>> {
    let id = route_id.resolve()?;
    Ok(Json(service.get(id)?))
}

async fn create_post_handler(
    State(service): State<Arc<PostService>>,
    Payload(body): Payload,
) -> ApiResult<Json<Post>> {
    let post = validate_create(&body).map_err(ApiError::PostNotValid)?;
    Ok(Json(service.create(post)?))
}

async fn delete_post_handler(
    State(service): State<Arc<PostService>>,
    route_id: RouteId,
) -> ApiResult<StatusCode> {
    let id = route_id.resolve()?;
    service.delete(id)?;
    Ok(StatusCode::OK)
}

async fn replace_post_handler(
    State(service): State<Arc<PostService>>,
    route_id: RouteId,
    Payload(body): Payload,
) -> ApiResult<Json<Post>> {
    let patch = validate_replace(&body).map_err(ApiError::PostNotValid)?;
    let id = route_id.resolve()?;
    Ok(Json(service.update(patch.into_update(id))?))
}

async fn patch_post_handler(
    State(service): State<Arc<PostService>>,
    route_id: RouteId,
    Payload(body): Payload,
) -> ApiResult<Json<Post>> {
    let patch = validate_patch(&body).map_err(ApiError::PostNotValid)?;
    let id = route_id.resolve()?;
    Ok(Json(service.update(patch.into_update(id))?))
}
