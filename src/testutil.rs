//! Shared test helpers for landing-files unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderValue;
use bytes::Bytes;

use crate::upstream::{HostAllowList, Upstream, UpstreamError, UpstreamFile};
use crate::AppState;

/// Upstream double that returns a canned result and counts fetches.
pub struct FakeUpstream {
    result: Result<UpstreamFile, u16>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    pub fn serving(content_type: Option<HeaderValue>, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(UpstreamFile {
                content_type,
                body: Bytes::from_static(body),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            result: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch(&self, _url: &str) -> Result<UpstreamFile, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(UpstreamError::Status)
    }
}

/// Create a test AppState around the given upstream.
pub fn test_state(upstream: Arc<dyn Upstream>, allowed_hosts: &[&str]) -> Arc<AppState> {
    Arc::new(AppState {
        allowed_hosts: HostAllowList::new(allowed_hosts),
        upstream,
    })
}
