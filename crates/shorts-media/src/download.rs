//! Remote source download.
//!
//! The [`RemoteFetcher`] trait is the seam between request handling and the
//! network. [`HttpFetcher`] streams a direct file URL to disk with a
//! timeout and a byte cap.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{MediaError, MediaResult};

/// Default timeout for a whole download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on downloaded bytes (2 GiB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Fetches a remote file into a local path.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Download `url` into `dest`, returning the number of bytes written.
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> MediaResult<u64>;
}

/// HTTP(S) fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Create a fetcher with the given whole-request timeout and byte cap.
    pub fn new(timeout: Duration, max_bytes: u64) -> MediaResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shorts-media/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MediaError::download_failed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    fn map_request_error(&self, e: reqwest::Error) -> MediaError {
        if e.is_timeout() {
            MediaError::Timeout(self.timeout.as_secs())
        } else {
            MediaError::download_failed(e.to_string())
        }
    }

    async fn stream_to_file(&self, response: reqwest::Response, dest: &Path) -> MediaResult<u64> {
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.map_request_error(e))?;
            written += chunk.len() as u64;
            if written > self.max_bytes {
                return Err(MediaError::ResourceLimit(format!(
                    "source exceeds {} bytes",
                    self.max_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(written)
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> MediaResult<u64> {
        let url = validate_source_url(url)?;
        let start = Instant::now();
        debug!(url = %url, dest = %dest.display(), "Downloading source");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::download_failed(format!("HTTP {}", status)));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(MediaError::ResourceLimit(format!(
                    "source is {} bytes, limit is {}",
                    len, self.max_bytes
                )));
            }
        }

        let written = match self.stream_to_file(response, dest).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    warn!("Failed to remove partial download {}: {}", dest.display(), rm);
                }
                return Err(e);
            }
        };

        info!(
            url = %url,
            bytes = written,
            duration_ms = start.elapsed().as_millis() as u64,
            "Source downloaded"
        );
        Ok(written)
    }
}

/// Parse a source URL and require an `http` or `https` scheme.
pub fn validate_source_url(raw: &str) -> MediaResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| MediaError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(MediaError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}
