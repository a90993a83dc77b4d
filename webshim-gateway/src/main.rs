//! Entry point for the `webshim-gateway` HTTP server.

use tracing::info;
use webshim_gateway::{config::GatewayConfig, routes::create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match GatewayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Dev-mode startup blocks here through dependency install and the
    // dev-server launch; any failure means no handler at all.
    let resolved =
        match webshim_assets::resolve(config.mode, &config.asset_root, &config.dev).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "failed to resolve asset handler");
                std::process::exit(1);
            }
        };

    let app = create_router(resolved.router);

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %config.listen_addr, mode = ?config.mode, "webshim-gateway listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    let failed = served.is_err();
    if let Err(e) = served {
        tracing::error!(error = %e, "server error");
    }

    // One-shot cleanup: stopping consumes the handle.
    if let Some(handle) = resolved.dev_server {
        if let Err(e) = handle.stop().await {
            tracing::error!(error = %e, "dev server stop failed");
        }
    }

    if failed {
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
