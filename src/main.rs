use std::sync::Arc;

use album_service::{
    config::AppConfig,
    o11y,
    routes::{self, AppState},
    services::albums::AlbumService,
    upstream::PhotoApiClient,
};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(AppConfig::load()?);

    let _telemetry = o11y::TelemetryGuard::init(&config)?;

    let catalog = Arc::new(PhotoApiClient::new(config.upstream.base_url.clone())?);
    let albums = Arc::new(AlbumService::new(catalog));
    let state = AppState::new(config.clone(), albums);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %config.listen_addr,
        upstream = %config.upstream.base_url,
        "HTTP server listening"
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
