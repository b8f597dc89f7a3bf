//! landing-files - Server-side pieces of the landing site
//!
//! This crate provides:
//! - A download proxy that relays remote storage files as attachments
//! - Read-only lookup of uploaded file records by slug (Firestore or a local redb mirror)
//! - Environment-driven configuration and tracing setup shared by both binaries

pub mod api;
pub mod config;
pub mod documents;
pub mod logging;
pub mod lookup;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod upstream;

use std::sync::Arc;

use upstream::{HostAllowList, Upstream};

/// Shared application state
pub struct AppState {
    pub allowed_hosts: HostAllowList,
    pub upstream: Arc<dyn Upstream>,
}
