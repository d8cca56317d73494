//!
//! Multi-tenant delivery pricing REST service.
//! Reads configuration from TOML file (~/.config/delivery-pricing/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use delivery_pricing::application::PricingService;
use delivery_pricing::config::AppConfig;
use delivery_pricing::domain::RateConfigRepository;
use delivery_pricing::shared::shutdown::ShutdownCoordinator;
use delivery_pricing::{create_api_router, default_config_path, load_seed_file, InMemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PRICING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Delivery Pricing Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Tenant rate-configuration store ────────────────────────
    let store = Arc::new(InMemoryStore::new());
    if let Some(seed_path) = &app_cfg.storage.seed_path {
        // A malformed seed entry aborts startup: serving quotes from a broken
        // rate table is worse than not starting.
        let configs = load_seed_file(seed_path)?;
        let count = configs.len();
        for config in configs {
            store.save(config).await?;
        }
        info!(count, path = %seed_path.display(), "Seeded tenant rate configurations");
    }

    // Initialize services
    let service = Arc::new(PricingService::new(store));

    // Initialize shutdown coordinator and listen for SIGTERM/SIGINT
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // Create REST API router
    let api_router = create_api_router(service, prometheus_handle);

    // Start REST API server with graceful shutdown
    let api_addr = app_cfg.api_address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal.wait().await;
        info!("🛑 REST API server received shutdown signal");
    })
    .await?;

    info!("👋 Delivery Pricing Service shutdown complete");
    Ok(())
}
