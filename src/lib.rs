//! posts-api - an in-memory REST CRUD service for posts
//!
//! The request pipeline is: route → payload validation → post service →
//! response, with every failure translated into a status + message reply.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod posts;
