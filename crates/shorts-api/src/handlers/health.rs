//! Service status and health check handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Root status response.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Service status at `/`.
pub async fn index() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Video processing service is running".to_string(),
    })
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
