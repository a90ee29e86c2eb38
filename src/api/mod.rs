//! HTTP API for the local refresh server.

pub mod handlers;

pub use handlers::AppState;
