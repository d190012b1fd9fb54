use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use scoped_fs::{FileScope, resolve_root};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::{AppState, create_files_router, create_tree_router};
use config::ServerConfig;

const CONFIG_FILE: &str = "webdesk.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting webdesk server");
    let config = if Path::new(CONFIG_FILE).exists() {
        info!("loading server config from {CONFIG_FILE}");
        ServerConfig::from_file(CONFIG_FILE)
            .with_context(|| format!("failed to load server config from {CONFIG_FILE}"))?
    } else {
        ServerConfig::default()
    };

    let (root, source) = resolve_root().context(
        "no usable root directory; set WEBDESK_ROOT to a readable and writable directory",
    )?;
    info!(root = %root.display(), source = source.as_str(), "serving files under root");

    let scope = FileScope::new(root);
    let state = Arc::new(AppState::new(
        scope,
        config.default_hide.clone(),
        config.default_depth,
    ));

    let app = create_files_router()
        .merge(create_tree_router())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(err) if err.kind() == io::ErrorKind::AddrInUse => {
            anyhow::bail!("address {} is already in use by another process", config.addr);
        }
        Err(err) => {
            return Err(anyhow::Error::from(err)
                .context(format!("failed to bind listener on {}", config.addr)));
        }
    };
    info!(addr = %config.addr, "listening, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received, stopping server");
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
