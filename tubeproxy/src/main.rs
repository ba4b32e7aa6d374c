mod app;
mod config;
mod download;
mod error;
mod formats;
mod handlers;
mod rate_limit;
mod state;
mod tool;

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubeproxy=info,yt_dlp=info,tower_http=debug".into())
        )
        .init();

    let config = Config::from_env();

    let app = if config.simple_mode {
        tracing::info!("Simple mode: redirecting every request");
        app::redirect_only_router()
    } else {
        let yt_dlp = tool::build_client(&config);

        match yt_dlp.check_binary().await {
            Ok(version) => tracing::info!("yt-dlp version: {}", version),
            Err(e) => tracing::warn!("yt-dlp not found or not executable: {}", e)
        }

        tracing::info!("Serving static files from {}", config.static_dir.display());
        app::router(AppState::new(yt_dlp), &config)
    };

    let addr = config.bind_addr();
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
