//! Structured request logging.
//!
//! One [`RequestLogger`] is created per process-video request and handed to
//! the processing service, which calls it at request start, for each
//! segment outcome and at request end.

use shorts_models::{SegmentBatch, SourceKind};
use tracing::{debug, error, info, warn, Span};

/// Request logger carrying the request and video identifiers.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    request_id: String,
    video_id: String,
}

impl RequestLogger {
    /// Create a new logger for one request.
    ///
    /// # Arguments
    /// * `request_id` - Value of the `X-Request-ID` header (or generated)
    /// * `video_id` - Caller-supplied video identifier
    pub fn new(request_id: &str, video_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            video_id: video_id.to_string(),
        }
    }

    /// Log the start of request processing.
    pub fn log_start(&self, source: SourceKind, segment_count: usize) {
        info!(
            request_id = %self.request_id,
            video_id = %self.video_id,
            source = source.as_str(),
            segments = segment_count,
            "Processing started"
        );
    }

    /// Log that the request falls back to placeholder segments.
    pub fn log_placeholder(&self, reason: &str) {
        warn!(
            request_id = %self.request_id,
            video_id = %self.video_id,
            "Using placeholder segments: {}", reason
        );
    }

    /// Log the outcome of every segment in a batch.
    pub fn log_segments(&self, batch: &SegmentBatch) {
        for record in &batch.records {
            debug!(
                request_id = %self.request_id,
                video_id = %self.video_id,
                segment_index = record.segment_index,
                duration = %record.duration,
                "Segment built"
            );
        }
        for failure in &batch.failures {
            warn!(
                request_id = %self.request_id,
                video_id = %self.video_id,
                segment_index = failure.segment_index,
                "Error processing segment {}: {}", failure.segment_index, failure.error
            );
        }
    }

    /// Log an error that aborts the request.
    pub fn log_error(&self, message: &str) {
        error!(
            request_id = %self.request_id,
            video_id = %self.video_id,
            "Processing failed: {}", message
        );
    }

    /// Log the completion of the request.
    pub fn log_completion(&self, status: &str, built: usize, dropped: usize) {
        info!(
            request_id = %self.request_id,
            video_id = %self.video_id,
            status,
            built,
            dropped,
            "Processing completed"
        );
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Create a tracing span for this request.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "process_video",
            request_id = %self.request_id,
            video_id = %self.video_id
        )
    }
}
