//! Crop Recommendation Service - Main Entry Point
//!
//! Loads the classifier, then serves the landing page, the measurement form
//! and predictions over HTTP.

use anyhow::{Context, Result};
use crop_recommendation::{
    config::{AppConfig, LogFormat, LoggingConfig},
    metrics::{MetricsReporter, ServiceMetrics},
    build_router, AppState, InferenceEngine, Presenter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Crop Recommendation Service");
    info!(
        model = %config.model.path,
        labels = config.model.labels.len(),
        "Configuration loaded successfully"
    );

    let engine = InferenceEngine::new(&config.model)?;
    let presenter = Presenter::new(&config.templates)?;
    let metrics = Arc::new(ServiceMetrics::new());

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = build_router(AppState::new(engine, presenter, metrics.clone()));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Serving on http://{}", addr);
    info!("   GET  /             - Landing page");
    info!("   GET  /Predict      - Measurement form");
    info!("   POST /form         - Form prediction");
    info!("   POST /api/predict  - JSON prediction");
    info!("   GET  /api/health   - Health check");
    info!("   GET  /api/stats    - Service metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "crop_recommendation={level},tower_http={level}",
            level = config.level
        ))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
