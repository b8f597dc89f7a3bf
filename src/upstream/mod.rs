mod allow_list;
mod http;

pub use allow_list::HostAllowList;
pub use http::HttpUpstream;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Upstream request failed: {0}")]
    Request(String),
    #[error("Upstream responded with status {0}")]
    Status(u16),
}

/// A remote file fully buffered in memory.
#[derive(Debug, Clone)]
pub struct UpstreamFile {
    /// Upstream `Content-Type`, byte for byte
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Fetches remote files on behalf of the download proxy.
/// One attempt per call: no retries, no range requests.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<UpstreamFile, UpstreamError>;
}
