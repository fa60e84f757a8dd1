// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use execli_core::domains::scraping::ReportJobHandler;
use execli_core::kernel::scheduled_tasks::start_scheduler;
use execli_core::kernel::{ChannelJobQueue, JobQueue, JobRunner, ServerDeps};
use execli_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,execli_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Execli VOC API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Background jobs
    let (queue, receiver) = ChannelJobQueue::new();
    let jobs: Arc<dyn JobQueue> = Arc::new(queue);
    let deps = ServerDeps::from_config(&config, pool.clone(), jobs.clone())?;

    let runner = JobRunner::new(receiver, Arc::new(ReportJobHandler::new(deps.clone())));
    tokio::spawn(runner.run());

    let mut scheduler = start_scheduler(
        pool,
        jobs,
        &config.sync_cron,
        config.sync_stale_after_hours,
    )
    .await
    .context("Failed to start scheduler")?;

    // Build application
    let app = build_app(deps, &config)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    })
    .await
    .context("Server error")?;

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler shutdown failed");
    }

    Ok(())
}
