//! HTTP server: loads settings, prepares the database, mounts the API.
//!
//! Run from repo root: `cargo run -p produtos-pessoas-server`

use produtos_pessoas::{app, apply_migrations, connect, ensure_database_exists, AppState, Config};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("produtos_pessoas=info,tower_http=info")
            }),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(environment = ?config.environment, docs = config.docs_enabled(), "configuration loaded");

    ensure_database_exists(&config.database_url).await?;
    let pool = connect(&config).await?;
    apply_migrations(&pool).await?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let state = AppState::postgres(pool.clone(), config);
    let router = app(state);

    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
