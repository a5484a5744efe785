//! Backend for a small cooperative decision-making tool.
//!
//! Users file *actions* (proposals, opinions) that may point at knowledge
//! *elements*; other users vote `-1`, `0` or `1` on them. The decision for
//! an action is recomputed from its votes on every read, see [`tally`].

use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tally;

use config::Config;
use routes::AppState;
use store::{MemoryStore, PgStore, Store};

/// Loads `.env` (so `RUST_LOG` and the settings read by [`Config::load`]
/// can live there) and installs the `fmt` subscriber.
pub fn init_tracing() {
    dotenv::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-memory store.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.max_connections).await?;
            info!("Connected to database!");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, data will only live in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let app = routes::router(AppState::new(store));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
