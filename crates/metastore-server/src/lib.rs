//! HTTP server for a metadata store.
//!
//! Exposes one shared store over REST so it can be inspected and mutated
//! remotely while the owning process keeps its own handle to it.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use endpoint::{endpoints, HealthResponse};
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use handler::AppState;
pub use server::MetastoreServer;
