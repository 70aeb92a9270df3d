//! Service entry-point: loads settings, wires adapters, and serves the
//! webhook endpoint with health probes and OpenAPI docs.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use stocksync::inbound::http::health::HealthState;
use stocksync::settings::AppSettings;

mod server;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?
        .validate()
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;

    let config = ServerConfig::new(settings);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::webhook_exporter());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

#[cfg(test)]
mod tests;
