//! Media helpers for the shorts segment service.
//!
//! This crate provides:
//! - Remote source download behind the [`RemoteFetcher`] trait
//! - Placeholder thumbnail rendering
//! - Request-scoped scratch directories with guaranteed cleanup

pub mod download;
pub mod error;
pub mod scratch;
pub mod thumbnail;

pub use download::{
    validate_source_url, HttpFetcher, RemoteFetcher, DEFAULT_DOWNLOAD_TIMEOUT,
    DEFAULT_MAX_DOWNLOAD_BYTES,
};
pub use error::{MediaError, MediaResult};
pub use scratch::{contained_path, ScratchDir};
pub use thumbnail::{ThumbnailRenderer, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
