//! # Posts Module
//!
//! The posts domain: the record type, the in-memory record store, the
//! service that owns all mutation, payload validation and the typed errors
//! the HTTP layer translates into responses.

pub mod errors;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use errors::{ApiError, ApiResult};
pub use model::{Post, PostUpdate};
pub use service::PostService;
pub use store::RecordStore;
pub use validation::{validate_create, validate_patch, validate_replace, PostPatch, Violations};
