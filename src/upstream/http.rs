use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, redirect, Client};

use super::{HostAllowList, Upstream, UpstreamError, UpstreamFile};

const MAX_REDIRECTS: usize = 10;

/// reqwest-backed upstream sharing one connection pool across requests.
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Every redirect hop must pass `allowed_hosts`; a refused hop stops the
    /// chain and its 3xx response is reported as an upstream failure.
    pub fn new(timeout: Duration, allowed_hosts: HostAllowList) -> Result<Self, anyhow::Error> {
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if !allowed_hosts.permits(attempt.url().as_str()) {
                tracing::warn!(
                    target = %attempt.url(),
                    "Refused redirect to host outside the allow-list"
                );
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .user_agent(concat!("landing-files/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, url: &str) -> Result<UpstreamFile, UpstreamError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| UpstreamError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status().as_u16()));
        }

        let content_type = resp.headers().get(header::CONTENT_TYPE).cloned();

        let body = resp
            .bytes()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(UpstreamFile { content_type, body })
    }
}
