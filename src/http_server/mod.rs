//! # HTTP Server Module
//!
//! Serves the posts API over axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/posts` - List and create posts
//! - `/posts/:id` - Fetch, replace, patch and delete one post

pub mod config;
pub mod health_routes;
pub mod payload;
pub mod posts_routes;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use payload::Payload;
pub use posts_routes::RouteId;
pub use server::HttpServer;
