//! Source URL classification.
//!
//! Only direct file URLs are fetched. YouTube links are recognised so the
//! service can answer them with placeholder segments instead of trying to
//! download an HTML page.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of video source referenced by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// youtube.com or youtu.be link (retrieval not implemented)
    YouTube,
    /// Any other URL, fetched as a plain file
    Direct,
}

impl SourceKind {
    /// Classify a source URL by substring match on the YouTube hosts.
    pub fn classify(url: &str) -> Self {
        if is_youtube_domain(url) {
            SourceKind::YouTube
        } else {
            SourceKind::Direct
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::YouTube => "youtube",
            SourceKind::Direct => "direct",
        }
    }
}

fn is_youtube_domain(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Best-effort extraction of the 11-character YouTube video ID.
///
/// Handles `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` links. Used
/// for log context only.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if !is_youtube_domain(url) {
        return None;
    }

    let markers = ["?v=", "&v=", "youtu.be/", "/embed/", "/shorts/"];
    markers
        .iter()
        .find_map(|marker| url.find(marker).map(|pos| &url[pos + marker.len()..]))
        .map(|rest| {
            let end = rest.find(['&', '#', '?', '/']).unwrap_or(rest.len());
            &rest[..end]
        })
        .filter(|id| {
            id.len() == 11
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(str::to_string)
}
