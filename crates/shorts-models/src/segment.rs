//! Segment input, resolved segment and output record models.
//!
//! Every input segment yields exactly one build attempt. Failed attempts
//! are recorded as [`SegmentFailure`]s and left out of the record list, so
//! the output may be shorter than the input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::timestamp::range_duration;

/// Timestamp range assumed when a segment omits one.
pub const DEFAULT_TIMESTAMP: &str = "00:00-00:30";

/// Duration reported by placeholder segments.
pub const PLACEHOLDER_DURATION: &str = "00:30";

/// Errors raised while building a single segment record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Malformed segment: {0}")]
    Malformed(String),

    #[error("Thumbnail generation failed: {0}")]
    Thumbnail(String),
}

impl SegmentError {
    pub fn thumbnail(msg: impl Into<String>) -> Self {
        Self::Thumbnail(msg.into())
    }
}

/// Caller-supplied segment description. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Range in `START-END` form, e.g. `"01:10-01:40"`
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SegmentInput {
    /// Decode one element of the request's `segments` array.
    pub fn from_value(value: &Value) -> Result<Self, SegmentError> {
        if !value.is_object() {
            return Err(SegmentError::Malformed(format!(
                "expected an object, got {}",
                json_kind(value)
            )));
        }
        Self::deserialize(value).map_err(|e| SegmentError::Malformed(e.to_string()))
    }

    /// Apply defaults and derive filenames for the segment at `index` (0-based).
    pub fn resolve(self, index: usize, video_id: &str) -> ResolvedSegment {
        let number = index + 1;
        ResolvedSegment {
            segment_index: number,
            title: self.title.unwrap_or_else(|| format!("Segment {}", number)),
            description: self.description.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(|| DEFAULT_TIMESTAMP.to_string()),
            video_filename: video_filename(video_id, number),
            thumbnail_filename: thumbnail_filename(video_id, number),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Output clip filename for a 1-based segment number.
pub fn video_filename(video_id: &str, number: usize) -> String {
    format!("{}_short_{}.mp4", video_id, number)
}

/// Thumbnail filename for a 1-based segment number.
pub fn thumbnail_filename(video_id: &str, number: usize) -> String {
    format!("{}_thumb_{}.jpg", video_id, number)
}

/// A segment with every default applied, ready to become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    /// 1-based position in the request
    pub segment_index: usize,
    pub title: String,
    pub description: String,
    /// Original range string, echoed back unmodified
    pub timestamp: String,
    pub video_filename: String,
    pub thumbnail_filename: String,
}

impl ResolvedSegment {
    pub fn into_record(self, duration: String) -> SegmentRecord {
        SegmentRecord {
            title: self.title,
            description: self.description,
            timestamp: self.timestamp,
            duration,
            video_filename: self.video_filename,
            thumbnail_filename: self.thumbnail_filename,
            segment_index: self.segment_index,
        }
    }
}

/// Per-segment metadata returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentRecord {
    pub title: String,
    pub description: String,
    pub timestamp: String,
    /// `MM:SS`
    pub duration: String,
    pub video_filename: String,
    pub thumbnail_filename: String,
    pub segment_index: usize,
}

/// A segment that was dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFailure {
    /// 1-based position in the request
    pub segment_index: usize,
    pub error: SegmentError,
}

/// Records built from one request plus the segments that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentBatch {
    pub records: Vec<SegmentRecord>,
    pub failures: Vec<SegmentFailure>,
}

impl SegmentBatch {
    /// Number of input segments left out of `records`.
    pub fn dropped(&self) -> usize {
        self.failures.len()
    }
}

/// Build records for a source that could not be processed.
///
/// Every record carries [`PLACEHOLDER_DURATION`]; timestamps are not parsed.
pub fn build_placeholder_segments(segments: &[Value], video_id: &str) -> SegmentBatch {
    build_batch(segments, video_id, |resolved| {
        Ok(resolved.into_record(PLACEHOLDER_DURATION.to_string()))
    })
}

/// Build records for a successfully fetched source.
///
/// The duration is computed from each segment's range. `on_segment` runs
/// once per resolved segment for side effects such as writing the
/// thumbnail; an error from it drops that segment only.
pub fn build_processed_segments<F>(
    segments: &[Value],
    video_id: &str,
    mut on_segment: F,
) -> SegmentBatch
where
    F: FnMut(&ResolvedSegment) -> Result<(), SegmentError>,
{
    build_batch(segments, video_id, |resolved| {
        let duration = range_duration(&resolved.timestamp);
        on_segment(&resolved)?;
        Ok(resolved.into_record(duration))
    })
}

fn build_batch<F>(segments: &[Value], video_id: &str, mut build: F) -> SegmentBatch
where
    F: FnMut(ResolvedSegment) -> Result<SegmentRecord, SegmentError>,
{
    let mut batch = SegmentBatch::default();

    for (index, value) in segments.iter().enumerate() {
        let result = SegmentInput::from_value(value)
            .and_then(|input| build(input.resolve(index, video_id)));

        match result {
            Ok(record) => batch.records.push(record),
            Err(error) => batch.failures.push(SegmentFailure {
                segment_index: index + 1,
                error,
            }),
        }
    }

    batch
}
