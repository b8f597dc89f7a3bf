use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{ApiError, AppQuery};
use crate::AppState;

/// Assumes upstream URLs are content-addressed storage links.
const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const DEFAULT_FILE_NAME: &str = "download";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Fetch a remote file and relay it as an attachment.
/// Route: GET /download?url=<url>&fileName=<name>
pub async fn download(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<DownloadParams>,
) -> Result<Response, ApiError> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    if !state.allowed_hosts.permits(&url) {
        tracing::warn!(url = %url, "Refused download from host outside the allow-list");
        return Err(ApiError::forbidden("URL host is not allowed"));
    }

    let file = state.upstream.fetch(&url).await.map_err(|e| {
        tracing::error!(url = %url, error = %e, "Download proxy fetch failed");
        ApiError::internal("Failed to download file")
    })?;

    let file_name = params
        .file_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    tracing::debug!(
        url = %url,
        file_name = %file_name,
        bytes = file.body.len(),
        "Relaying download"
    );

    let byte_size = file.body.len() as u64;
    let mut response = (StatusCode::OK, file.body).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        file.content_type
            .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(byte_size));
    headers.insert(header::CONTENT_DISPOSITION, content_disposition(&file_name));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE));

    Ok(response)
}

// ============================================================================
// Helpers
// ============================================================================

/// Build `attachment; filename="<name>"`, replacing characters that would
/// break out of the quoted string or make the header invalid.
fn content_disposition(file_name: &str) -> HeaderValue {
    let sanitized: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    HeaderValue::from_bytes(format!("attachment; filename=\"{sanitized}\"").as_bytes())
        .unwrap_or(HeaderValue::from_static("attachment; filename=\"download\""))
}
