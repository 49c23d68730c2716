//! Process-video handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Uri;
use axum::{Extension, Json};
use shorts_models::{ProcessVideoRequest, ProcessVideoResponse};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::logging::RequestLogger;
use crate::middleware::RequestId;
use crate::services::ProcessOutcome;
use crate::state::AppState;

/// Build segment metadata for a source video.
///
/// The body is decoded by hand so that any unusable body (empty, not JSON,
/// missing or mistyped field) is reported as missing parameters before any
/// scratch directory or download is touched.
pub async fn process_video(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    body: Bytes,
) -> ApiResult<Json<ProcessVideoResponse>> {
    let request = parse_request(&body)?;

    let request_id = request_id
        .map(|Extension(id)| id.0)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let logger = RequestLogger::new(&request_id, &request.video_id);

    let outcome = state
        .processor
        .process(&request, &logger)
        .await
        .inspect_err(|e| logger.log_error(&e.to_string()))
        .map_err(|e| e.for_environment(state.config.is_production()))?;

    let response = match outcome {
        ProcessOutcome::Processed(batch) => ProcessVideoResponse::success(batch),
        ProcessOutcome::Placeholder { reason, batch } => {
            ProcessVideoResponse::placeholder(reason.message(), batch)
        }
    };

    logger.log_completion(
        response.status.as_str(),
        response.segments.len(),
        response.dropped_segments,
    );

    Ok(Json(response))
}

fn parse_request(body: &[u8]) -> ApiResult<ProcessVideoRequest> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected process-video body: {}", e);
        ApiError::missing_parameters()
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path().to_string())
}
