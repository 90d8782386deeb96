//! Posts API End-to-End Tests
//!
//! Drives the full router in-process: routing, body decoding, validation,
//! the post service, error translation, CORS and request logging layers.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use posts_api::http_server::{HttpServer, ServerConfig};
use posts_api::posts::{Post, PostService};
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    app_with(PostService::new())
}

fn app_with(service: PostService) -> Router {
    HttpServer::build_router(&ServerConfig::default(), Arc::new(service))
}

fn seeded_app() -> Router {
    app_with(PostService::with_seed([
        Post::new(1, "First", "Body one", 10),
        Post::new(2, "Second", "Body two", 20),
    ]))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

// =============================================================================
// Create / Read / Delete
// =============================================================================

/// Create, fetch, delete, then fetch again.
#[tokio::test]
async fn test_create_get_delete_lifecycle() {
    let app = app();
    let post = json!({ "id": 1, "title": "A", "body": "B", "userId": 1 });

    let (status, body) = send(&app, Method::POST, "/posts", Some(post.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), post);

    let (status, body) = send(&app, Method::GET, "/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), post);

    let (status, body) = send(&app, Method::DELETE, "/posts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, body) = send(&app, Method::GET, "/posts/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post with id 1 not found");
}

#[tokio::test]
async fn test_list_returns_posts_in_order() {
    let app = seeded_app();

    let (status, body) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<u64> = parse(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_list_excludes_deleted_posts() {
    let app = seeded_app();
    send(
        &app,
        Method::POST,
        "/posts",
        Some(json!({ "id": 3, "title": "T", "body": "B", "userId": 1 })),
    )
    .await;
    send(&app, Method::DELETE, "/posts/2", None).await;

    let (_, body) = send(&app, Method::GET, "/posts", None).await;
    let ids: Vec<u64> = parse(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (status, body) = send(&app(), Method::DELETE, "/posts/8", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post with id 8 not found");
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let (status, body) = send(&seeded_app(), Method::GET, "/posts/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post with id NaN not found");
}

#[tokio::test]
async fn test_id_with_trailing_text_uses_leading_digits() {
    let (status, body) = send(&seeded_app(), Method::GET, "/posts/2abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["title"], "Second");
}

#[tokio::test]
async fn test_create_with_existing_id_overwrites() {
    let app = seeded_app();
    let replacement = json!({ "id": 1, "title": "Again", "body": "Again", "userId": 3 });

    let (status, _) = send(&app, Method::POST, "/posts", Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/posts", None).await;
    let posts = parse(&body);
    assert_eq!(posts.as_array().unwrap().len(), 2);
    assert_eq!(posts[0], replacement);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_create_missing_title_is_rejected() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/posts",
        Some(json!({ "id": 1, "body": "B", "userId": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("title is a required field"));
}

#[tokio::test]
async fn test_create_negative_user_id_is_rejected() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/posts",
        Some(json!({ "id": 1, "title": "A", "body": "B", "userId": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "userId must be a positive number");
}

#[tokio::test]
async fn test_create_reports_all_violations_comma_joined() {
    let (status, body) = send(&app(), Method::POST, "/posts", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        "id is a required field, title is a required field, \
         body is a required field, userId is a required field"
    );
}

#[tokio::test]
async fn test_create_rejects_extra_fields() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/posts",
        Some(json!({ "id": 1, "title": "A", "body": "B", "userId": 1, "likes": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "this field has unspecified keys: likes");
}

#[tokio::test]
async fn test_rejected_create_leaves_store_untouched() {
    let app = app();
    send(&app, Method::POST, "/posts", Some(json!({ "id": 1, "title": "A" }))).await;

    let (_, body) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"id\": 1,"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_body_values_are_not_coerced() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("id=1&title=A&body=B&userId=1"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        "id must be a `number` type, userId must be a `number` type"
    );
}

// =============================================================================
// Replace / Patch
// =============================================================================

#[tokio::test]
async fn test_replace_updates_every_field() {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/posts/1",
        Some(json!({ "title": "T", "body": "B", "userId": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body),
        json!({ "id": 1, "title": "T", "body": "B", "userId": 5 })
    );
}

#[tokio::test]
async fn test_replace_uses_route_id_over_body_id() {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/posts/2",
        Some(json!({ "id": 1, "title": "T", "body": "B", "userId": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["id"], 2);

    let (_, body) = send(&app, Method::GET, "/posts/1", None).await;
    assert_eq!(parse(&body)["title"], "First");
}

#[tokio::test]
async fn test_replace_missing_post_is_not_found() {
    let (status, body) = send(
        &seeded_app(),
        Method::PUT,
        "/posts/9",
        Some(json!({ "title": "T", "body": "B", "userId": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post with id 9 not found");
}

#[tokio::test]
async fn test_replace_validates_before_lookup() {
    let (status, body) = send(
        &seeded_app(),
        Method::PUT,
        "/posts/9",
        Some(json!({ "title": "T" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "body is a required field, userId is a required field");
}

#[tokio::test]
async fn test_patch_changes_only_supplied_fields() {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/posts/1",
        Some(json!({ "title": "New" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body),
        json!({ "id": 1, "title": "New", "body": "Body one", "userId": 10 })
    );
}

#[tokio::test]
async fn test_patch_twice_yields_same_record() {
    let app = seeded_app();
    let patch = json!({ "body": "Patched", "userId": null });

    let (_, first) = send(&app, Method::PATCH, "/posts/2", Some(patch.clone())).await;
    let (_, second) = send(&app, Method::PATCH, "/posts/2", Some(patch)).await;

    assert_eq!(parse(&first), parse(&second));
    assert_eq!(
        parse(&second),
        json!({ "id": 2, "title": "Second", "body": "Patched", "userId": 20 })
    );
}

#[tokio::test]
async fn test_patch_with_invalid_user_id() {
    let (status, body) = send(
        &seeded_app(),
        Method::PATCH,
        "/posts/1",
        Some(json!({ "userId": "ten" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "userId must be a `number` type");
}

#[tokio::test]
async fn test_patch_missing_post_is_not_found() {
    let (status, body) = send(
        &app(),
        Method::PATCH,
        "/posts/xyz",
        Some(json!({ "title": "New" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post with id NaN not found");
}

// =============================================================================
// Collaborators
// =============================================================================

#[tokio::test]
async fn test_error_responses_are_plain_text() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/posts/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/posts")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/posts/1")
                .header(header::ORIGIN, "http://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_health_reports_post_count() {
    let (status, body) = send(&seeded_app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let health = parse(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["posts"], 2);
}

#[tokio::test]
async fn test_undecodable_id_is_bad_request() {
    let (status, body) = send(&seeded_app(), Method::GET, "/posts/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Malformed request path: "), "{}", body);
}

#[tokio::test]
async fn test_id_beyond_u64_is_out_of_range() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/posts",
        Some(json!({ "id": 1e20, "title": "A", "body": "B", "userId": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "id must be less than or equal to 18446744073709551615");
}

// =============================================================================
// Request Logging
// =============================================================================

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Sends one request with a JSON subscriber installed for this thread only.
async fn send_logged(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<String>) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, _) = send(app, method, uri, None).await;
    (status, logs.lines())
}

#[tokio::test]
async fn test_failure_is_logged_at_error_with_path_and_message() {
    let (status, lines) = send_logged(&app(), Method::GET, "/posts/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let failure = lines
        .iter()
        .find(|line| line.contains("\"level\":\"ERROR\""))
        .unwrap_or_else(|| panic!("no error line in {:?}", lines));
    assert!(failure.contains("\"path\":\"/posts/7\""), "{}", failure);
    assert!(failure.contains("Post with id 7 not found"), "{}", failure);
}

#[tokio::test]
async fn test_undecodable_id_is_logged_at_error() {
    let (status, lines) = send_logged(&app(), Method::DELETE, "/posts/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let failure = lines
        .iter()
        .find(|line| line.contains("\"level\":\"ERROR\""))
        .unwrap_or_else(|| panic!("no error line in {:?}", lines));
    assert!(failure.contains("Malformed request path"), "{}", failure);
}

#[tokio::test]
async fn test_success_is_not_logged_at_error() {
    let (status, lines) = send_logged(&seeded_app(), Method::GET, "/posts/1").await;
    assert_eq!(status, StatusCode::OK);

    assert!(!lines.is_empty());
    assert!(lines.iter().all(|line| !line.contains("\"level\":\"ERROR\"")));
}
