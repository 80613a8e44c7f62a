//! ConfigFlow server binary.

use std::sync::Arc;

use clap::Parser;
use configflow_core::{AdminService, Store};
use configflow_server::{create_router, AppState, Args, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "configflow_server={0},configflow_core={0},tower_http=info",
                log_filter
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::try_from(args)?;

    info!(
        listen = %config.listen_addr(),
        data_path = %config.data_path.display(),
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        token_ttl_secs = config.auth.token_ttl.as_secs(),
        "starting ConfigFlow server"
    );

    let store = Arc::new(Store::open(config.storage_config())?);
    if store.was_recovered() {
        info!("store recovered from previous run");
    }

    if let Some(bootstrap) = config.bootstrap_admin.clone() {
        let admins = AdminService::new(store.clone());
        tokio::task::spawn_blocking(move || {
            admins.bootstrap(&bootstrap.username, &bootstrap.password)
        })
        .await??;
    }

    let state = AppState::new(store.clone(), &config.auth)
        .with_request_timeout(config.request_timeout);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    info!("listening on {}", config.listen_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let flushed = store.flush()?;
    info!(bytes = flushed, "server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
