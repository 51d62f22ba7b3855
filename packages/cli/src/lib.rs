// ABOUTME: Tasklane server bootstrap
// ABOUTME: Logging setup, database opening and the HTTP serve loop

use anyhow::Context;
use sqlx::SqlitePool;
use tasklane_api::AppState;
use tasklane_storage::StorageConfig;
use tracing::info;

pub mod api;
pub mod config;
pub mod middleware;

use config::Config;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Open the configured database file, applying pending migrations
pub async fn open_database(config: &Config) -> anyhow::Result<SqlitePool> {
    tasklane_storage::connect(&config.database_path, &StorageConfig::default())
        .await
        .with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database_path.display()
            )
        })
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = open_database(&config).await?;
    let state = AppState::new(pool, &config.jwt_config());
    let app = api::create_router(state, &config)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        database = %config.database_path.display(),
        cors_origin = %config.cors_origin,
        "Tasklane server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
