use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_core::{Config, WeatherService, source_from_config};

use crate::http;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "City-code weather forecast server")]
pub struct Cli {
    /// Port to listen on; overrides PORT and the config file.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Path to a TOML config file.
    #[arg(long, env = "WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_tracing(&self.log_level);

        let mut config = Config::load(self.config.as_deref())?;
        if let Some(port) = self.port {
            config.port = port;
        }

        if !config.is_api_key_configured() {
            warn!(
                "{} is not set; forecast requests will fail until it is configured",
                weather_core::config::API_KEY_ENV
            );
        }

        let source = source_from_config(&config)?;
        let port = config.port;
        let service = WeatherService::new(Arc::new(config), source);

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("Failed to bind to port {port}"))?;
        info!("weather server listening on http://0.0.0.0:{port}");

        axum::serve(listener, http::router(service))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server terminated unexpectedly")?;

        info!("weather server stopped");
        Ok(())
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
