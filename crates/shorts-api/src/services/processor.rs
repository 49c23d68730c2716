//! Process-video orchestration.
//!
//! Classifies the source, fetches direct URLs into a scratch directory and
//! builds segment records. Download problems and unsupported sources are
//! not errors here; they produce placeholder segments.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use shorts_media::{contained_path, MediaError, RemoteFetcher, ScratchDir, ThumbnailRenderer};
use shorts_models::source::youtube_video_id;
use shorts_models::{
    build_placeholder_segments, build_processed_segments, ProcessVideoRequest, SegmentBatch,
    SegmentError, SourceKind,
};
use tracing::Instrument;

use crate::error::{ApiError, ApiResult};
use crate::logging::RequestLogger;
use crate::metrics;

/// Why a request was answered with placeholder segments.
#[derive(Debug)]
pub enum PlaceholderReason {
    /// Recognised source whose retrieval is not implemented
    UnsupportedSource(SourceKind),
    /// Fetching the source failed
    DownloadFailed(MediaError),
}

impl PlaceholderReason {
    /// Message returned to the caller.
    pub fn message(&self) -> String {
        match self {
            PlaceholderReason::UnsupportedSource(SourceKind::YouTube) => {
                "YouTube processing not implemented yet".to_string()
            }
            PlaceholderReason::UnsupportedSource(kind) => {
                format!("Processing {} sources is not supported", kind.as_str())
            }
            PlaceholderReason::DownloadFailed(e) => format!("Failed to download video: {}", e),
        }
    }

    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            PlaceholderReason::UnsupportedSource(_) => "unsupported_source",
            PlaceholderReason::DownloadFailed(_) => "download_failed",
        }
    }
}

/// Result of processing one request.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Source fetched; durations computed and thumbnails rendered
    Processed(SegmentBatch),
    /// Source unavailable; fixed-duration placeholder records
    Placeholder {
        reason: PlaceholderReason,
        batch: SegmentBatch,
    },
}

/// Turns process-video requests into segment batches.
#[derive(Clone)]
pub struct SegmentProcessor {
    fetcher: Arc<dyn RemoteFetcher>,
    thumbnails: ThumbnailRenderer,
    scratch_root: Option<PathBuf>,
}

impl SegmentProcessor {
    pub fn new(
        fetcher: Arc<dyn RemoteFetcher>,
        thumbnails: ThumbnailRenderer,
        scratch_root: Option<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            thumbnails,
            scratch_root,
        }
    }

    /// Process one request.
    ///
    /// Only failures outside the per-segment and download paths (scratch
    /// directory creation, a panicked worker task) are returned as errors.
    pub async fn process(
        &self,
        request: &ProcessVideoRequest,
        logger: &RequestLogger,
    ) -> ApiResult<ProcessOutcome> {
        self.process_inner(request, logger)
            .instrument(logger.create_span())
            .await
    }

    async fn process_inner(
        &self,
        request: &ProcessVideoRequest,
        logger: &RequestLogger,
    ) -> ApiResult<ProcessOutcome> {
        let source = SourceKind::classify(&request.video_url);
        logger.log_start(source, request.segments.len());

        if source == SourceKind::YouTube {
            if let Some(id) = youtube_video_id(&request.video_url) {
                tracing::debug!(youtube_id = %id, "YouTube source detected");
            }
            return Ok(self.placeholder(request, PlaceholderReason::UnsupportedSource(source), logger));
        }

        let scratch = ScratchDir::create(self.scratch_root.as_deref())
            .map_err(|e| ApiError::internal(format!("Failed to create scratch directory: {}", e)))?;

        let start = Instant::now();
        if let Err(e) = self
            .fetcher
            .fetch_to_file(&request.video_url, &scratch.source_path())
            .await
        {
            return Ok(self.placeholder(request, PlaceholderReason::DownloadFailed(e), logger));
        }
        metrics::record_download_duration(start.elapsed().as_secs_f64());

        let segments = request.segments.clone();
        let video_id = request.video_id.clone();
        let renderer = self.thumbnails.clone();
        let dir = scratch.path().to_path_buf();

        // Thumbnail encoding is CPU-bound
        let batch = tokio::task::spawn_blocking(move || {
            build_processed_segments(&segments, &video_id, |segment| {
                contained_path(&dir, &segment.thumbnail_filename)
                    .and_then(|path| renderer.write_jpeg(&segment.title, &path))
                    .map_err(|e| SegmentError::thumbnail(e.to_string()))
            })
        })
        .await
        .map_err(|e| ApiError::internal(format!("Segment processing task failed: {}", e)))?;

        logger.log_segments(&batch);
        metrics::record_segments("processed", batch.records.len(), batch.dropped());

        drop(scratch);
        Ok(ProcessOutcome::Processed(batch))
    }

    fn placeholder(
        &self,
        request: &ProcessVideoRequest,
        reason: PlaceholderReason,
        logger: &RequestLogger,
    ) -> ProcessOutcome {
        logger.log_placeholder(&reason.message());
        metrics::record_placeholder(reason.label());

        let batch = build_placeholder_segments(&request.segments, &request.video_id);
        logger.log_segments(&batch);
        metrics::record_segments("placeholder", batch.records.len(), batch.dropped());

        ProcessOutcome::Placeholder { reason, batch }
    }
}
