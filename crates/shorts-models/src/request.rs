//! Request and response bodies for `POST /api/process-video`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::segment::{SegmentBatch, SegmentRecord};

/// Body of a process-video request.
///
/// All three fields are required. Individual `segments` entries are kept as
/// raw JSON so that one malformed entry drops only that segment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    pub video_url: String,
    pub video_id: String,
    pub segments: Vec<Value>,
}

/// Outcome reported in [`ProcessVideoResponse::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Source fetched and segments processed
    Success,
    /// Source could not be processed; segments are placeholders
    Placeholder,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "success",
            ResponseStatus::Placeholder => "placeholder",
        }
    }
}

/// Body of a process-video response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessVideoResponse {
    pub status: ResponseStatus,
    pub message: String,
    /// Reason the source could not be processed (placeholder responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub segments: Vec<SegmentRecord>,
    /// Input segments omitted from `segments` because they failed to build
    pub dropped_segments: usize,
}

impl ProcessVideoResponse {
    pub const SUCCESS_MESSAGE: &'static str = "Video processing completed";

    pub fn success(batch: SegmentBatch) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Self::SUCCESS_MESSAGE.to_string(),
            error: None,
            dropped_segments: batch.dropped(),
            segments: batch.records,
        }
    }

    pub fn placeholder(reason: impl Into<String>, batch: SegmentBatch) -> Self {
        let reason = reason.into();
        Self {
            status: ResponseStatus::Placeholder,
            message: reason.clone(),
            error: Some(reason),
            dropped_segments: batch.dropped(),
            segments: batch.records,
        }
    }
}
