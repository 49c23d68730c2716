//! Application state.

use std::sync::Arc;

use shorts_media::{HttpFetcher, MediaResult, RemoteFetcher, ThumbnailRenderer};

use crate::config::ApiConfig;
use crate::services::SegmentProcessor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub processor: Arc<SegmentProcessor>,
}

impl AppState {
    /// Create application state with the HTTP fetcher.
    pub fn new(config: ApiConfig) -> MediaResult<Self> {
        let fetcher = HttpFetcher::new(config.download_timeout, config.max_download_bytes)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create application state around a custom fetcher.
    pub fn with_fetcher(config: ApiConfig, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        let thumbnails = ThumbnailRenderer::from_font_path(config.thumbnail_font_path.as_deref());
        let processor = SegmentProcessor::new(fetcher, thumbnails, config.scratch_root.clone());

        Self {
            config,
            processor: Arc::new(processor),
        }
    }
}
