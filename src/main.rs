//! forecast-api: a weather forecast HTTP service.
//!
//! This is the application entry point. It resolves the environment profile,
//! loads configuration from TOML files, initializes tracing, sets up the Axum
//! router, and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forecast_api::config::{
    resolve_config_path, AppConfig, Environment, LogFormat, ENVIRONMENT_VAR,
};
use forecast_api::http::start_server;
use forecast_api::{create_router, AppState};

/// forecast-api: serves a randomly generated weather forecast
#[derive(Parser, Debug)]
#[command(name = "forecast-api", version, about)]
struct Args {
    /// Path to configuration file [default: config/default.toml, then /etc/forecast-api/default.toml]
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "forecast_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Environment profile (Development, Staging, Production, ...)
    #[arg(short, long, env = ENVIRONMENT_VAR)]
    environment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let environment = args
        .environment
        .as_deref()
        .map(Environment::from_name)
        .unwrap_or_default();

    // Configuration comes first: it decides the log format
    let config_path = resolve_config_path(args.config.as_deref());
    let config = AppConfig::load(&config_path, &environment)?;

    // Log filter priority: CLI > env > profile default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| environment.default_log_filter().to_string());

    let registry = tracing_subscriber::registry().with(EnvFilter::new(&log_filter));
    match config.logging.effective_format(&environment) {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        environment = %environment,
        config = %config_path.display(),
        "Loaded configuration"
    );
    tracing::info!(
        days = config.forecast.days,
        min_temperature_c = config.forecast.min_temperature_c,
        max_temperature_c = config.forecast.max_temperature_c,
        summaries = config.forecast.summaries.len(),
        "Forecast configured"
    );

    let state = AppState::new(&config, environment)?;
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
