use std::sync::Arc;
use tracing::info;

use landing_files::{
    api,
    config::Config,
    logging::{self, LogTarget},
    upstream::{HostAllowList, HttpUpstream},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info", LogTarget::Stdout);

    info!(version = env!("CARGO_PKG_VERSION"), "landing-files starting");

    // Load configuration
    let config = Config::load()?;
    info!(
        firebase_configured = config.firebase.is_configured(),
        supabase_configured = config.supabase.is_configured(),
        "Loaded configuration"
    );

    let allowed_hosts = HostAllowList::new(&config.download.allowed_hosts);
    if allowed_hosts.is_empty() {
        tracing::warn!("DOWNLOAD_ALLOWED_HOSTS is empty; the download proxy will fetch any URL");
    } else {
        info!(hosts = ?config.download.allowed_hosts, "Download host allow-list active");
    }

    // One HTTP client for every proxied download; redirects are held to the same allow-list
    let upstream = HttpUpstream::new(config.download.timeout, allowed_hosts.clone())?;
    info!(
        timeout_secs = config.download.timeout.as_secs(),
        "Download proxy client ready"
    );

    // Create shared state
    let state = Arc::new(AppState {
        allowed_hosts,
        upstream: Arc::new(upstream),
    });

    // Build and start the HTTP server
    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!("Listening on: {}", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
