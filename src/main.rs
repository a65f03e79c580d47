use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devicelink::config::Config;
use devicelink::db::{self, AppState};
use devicelink::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env as a side effect, so it must run before the log filter is read
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devicelink=info,tower_http=info".into()),
        )
        .init();

    let pool = db::create_pool(&config.database_path)
        .with_context(|| format!("failed to open database at {}", config.database_path))?;
    tracing::info!("Database ready at {}", config.database_path);

    if config.service_key.is_some() {
        tracing::warn!(
            "SERVICE_KEY is set: /rpc seeding procedures are enabled and can wipe all data"
        );
    } else {
        tracing::info!("SERVICE_KEY not set, seeding procedures disabled");
    }

    let state = AppState {
        db: pool,
        service_key: config.service_key.clone(),
    };

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;
    tracing::info!("Listening on {}", config.addr());

    axum::serve(listener, handlers::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
