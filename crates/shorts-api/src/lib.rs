//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /api/process-video` returning clip and thumbnail metadata
//! - Placeholder segments for unsupported or unreachable sources
//! - Request IDs, structured request logging and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::SegmentProcessor;
pub use state::AppState;
