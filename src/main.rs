//! Avatreat API - Main Entry Point

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avatreat::application::use_cases::DatasetCodecs;
use avatreat::infrastructure::driven_adapters::config::AppConfig;
use avatreat::infrastructure::driven_adapters::database::create_pool;
use avatreat::infrastructure::driven_adapters::{ColumnsCodec, CsvCodec, HttpDatasetFetcher, PostgresDesignRepository};
use avatreat::infrastructure::driving_adapters::api_rest::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; LOG_FORMAT=json switches to structured output
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avatreat=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create adapters
    let design_repository = Arc::new(PostgresDesignRepository::new(pool));
    let dataset_fetcher = Arc::new(HttpDatasetFetcher::new(
        Duration::from_secs(config.limits.fetch_timeout_secs),
        config.limits.max_body_bytes,
    )?);
    let codecs = DatasetCodecs::new(vec![Arc::new(CsvCodec), Arc::new(ColumnsCodec)]);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, design_repository, dataset_fetcher, codecs));

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
