use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stocksight::config::Config;
use stocksight::middleware::RequestId;
use stocksight::modules::reports::controllers::{self, ReportContext};
use stocksight::modules::reports::repositories::{MetadataRepository, SqliteMetadataRepository};
use stocksight::modules::reports::services::{ExpirationSweep, ReportService};
use stocksight::modules::upstream::services::HttpUpstreamGateway;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.default_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StockSight Report Service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool (runs pending migrations)
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.max_connections
    );

    let upstream = Arc::new(HttpUpstreamGateway::new(config.upstream.clone()));
    let service = Arc::new(ReportService::new(upstream, config.reports.top_n));
    let metadata: Arc<dyn MetadataRepository> =
        Arc::new(SqliteMetadataRepository::new(db_pool.clone()));

    // Background sweep flipping overdue metadata records to expired
    let sweep = Arc::new(ExpirationSweep::new(
        metadata.clone(),
        Duration::from_secs(config.reports.sweep_interval_secs),
    ));
    tokio::spawn(sweep.start());

    let context = ReportContext {
        service,
        metadata,
        retention_days: config.reports.retention_days,
    };

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .app_data(web::Data::new(context.clone()))
            .configure(controllers::configure)
            .route("/health", web::get().to(health_check))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "stocksight"
    }))
}
