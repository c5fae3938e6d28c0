use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use school_service::auth::IdentityProvider;
use school_service::config::ServerConfig;
use school_service::{app, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::parse();

    init_standard_tracing(env!("CARGO_CRATE_NAME"), &config.log_level);

    tracing::info!("Starting application in {} environment...", config.app_env);

    let provider = Arc::new(IdentityProvider::new());
    match config.jwt_secret.as_deref() {
        Some(secret) => {
            provider.load(secret.as_bytes());
            tracing::info!("Identity provider key loaded");
        }
        None => tracing::warn!("JWT_SECRET not set, the sign-in gate will report loading"),
    }

    let app = app::create_app(provider, &config);

    let http_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {http_address}"))?;

    tracing::info!("HTTP server listening on {}", &http_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
