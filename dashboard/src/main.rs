use dashboard::cache::CachedSource;
use dashboard::{metrics, rest, Config, CsvSource, Engine, TableSource};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dashboard=info,tower_http=info")),
        )
        .init();

    info!("Starting fleet dashboard");
    info!("Data directory: {}", config.data_dir.display());
    info!("HTTP server: {}", config.http_addr);
    info!(
        "Windows: fleet {}h, machine {}h, sampling interval {}s",
        config.engine.fleet_window_hours,
        config.engine.machine_window_hours,
        config.engine.sampling_interval_secs
    );

    if let Err(e) = metrics::init_metrics() {
        error!("Failed to register metrics: {}", e);
        std::process::exit(1);
    }

    let csv = CsvSource::new(config.data_dir.clone());
    let source: Arc<dyn TableSource> = if config.cache_tables {
        info!("Table cache enabled (modification-time invalidation)");
        Arc::new(CachedSource::new(csv))
    } else {
        Arc::new(csv)
    };
    let engine = Engine::new(source, config.engine.clone());

    let app = rest::create_router(engine);

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal");
    });

    if let Err(e) = server.await {
        error!("HTTP server error: {}", e);
    }

    info!("Shutting down");
}
