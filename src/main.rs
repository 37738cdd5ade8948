//! Server binary: load config, open the store, serve until SIGINT/SIGTERM.

use pokedex_api::{
    app, ensure_database_exists, set_verbose_errors, AppConfig, AppState, MemoryStore, PgStore,
    StorageBackend,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let default_filter = if config.is_development() {
        "pokedex_api=debug,tower_http=debug"
    } else {
        "pokedex_api=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
    set_verbose_errors(config.is_development());

    let (state, pg) = match config.storage {
        StorageBackend::Postgres => {
            ensure_database_exists(&config.database.connect_options()?).await?;
            let store = PgStore::connect(&config.database).await?;
            store.ensure_schema().await?;
            store.seed_types_if_empty().await?;
            (AppState::new(Arc::new(store.clone())), Some(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            (AppState::new(Arc::new(MemoryStore::with_default_types())), None)
        }
    };

    let router = app(state, &config);
    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(environment = ?config.environment, "listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = pg {
        store.close().await;
        tracing::info!("database pool closed");
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
