//! Shared data models for the shorts segment service.
//!
//! This crate provides:
//! - Timestamp parsing and `MM:SS` duration calculation
//! - Segment inputs, records and the placeholder/processed builders
//! - Source URL classification
//! - Request/response bodies for the HTTP API

pub mod request;
pub mod segment;
pub mod source;
pub mod timestamp;

// Re-export common types
pub use request::{ProcessVideoRequest, ProcessVideoResponse, ResponseStatus};
pub use segment::{
    build_placeholder_segments, build_processed_segments, ResolvedSegment, SegmentBatch,
    SegmentError, SegmentFailure, SegmentInput, SegmentRecord,
};
pub use source::SourceKind;
pub use timestamp::{calculate_duration, timestamp_to_seconds, TimestampError};
