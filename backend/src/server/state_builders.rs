//! Adapter selection and HTTP state assembly.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use stocksync::domain::ports::{WebhookMetrics, WebhookReceiver};
use stocksync::domain::{WebhookReceiverPorts, WebhookReceiverService};
use stocksync::inbound::http::signature::SignatureVerifier;
use stocksync::inbound::http::state::HttpState;
use stocksync::outbound::catalog::CatalogHttpRepository;
use stocksync::outbound::memory::InMemorySeenStore;
use stocksync::outbound::payments::PaymentsHttpLineItemSource;

use super::ServerConfig;

/// Select the metrics recorder.
///
/// Prometheus-backed counters are registered when the exporter is
/// configured; otherwise recording is a no-op.
///
/// # Errors
/// Returns [`io::Error`] if counter registration fails.
#[cfg(feature = "metrics")]
fn build_webhook_metrics(config: &ServerConfig) -> io::Result<Arc<dyn WebhookMetrics>> {
    use stocksync::domain::ports::NoOpWebhookMetrics;
    use stocksync::outbound::metrics::PrometheusWebhookMetrics;

    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusWebhookMetrics::new(&prom.registry).map_err(|e| {
                io::Error::other(format!("webhook metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpWebhookMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_webhook_metrics(_config: &ServerConfig) -> io::Result<Arc<dyn WebhookMetrics>> {
    Ok(Arc::new(stocksync::domain::ports::NoOpWebhookMetrics))
}

/// Wire the receiver service to its HTTP adapters and in-memory seen sets.
///
/// # Errors
/// Returns [`io::Error`] when an HTTP client cannot be built or metrics
/// registration fails.
pub(super) fn build_webhook_receiver(config: &ServerConfig) -> io::Result<Arc<dyn WebhookReceiver>> {
    let settings = &config.settings;
    let catalog = CatalogHttpRepository::new(
        settings.catalog_url.clone(),
        settings.catalog_token.clone(),
        settings.request_timeout,
    )
    .map_err(|e| io::Error::other(format!("catalog client construction failed: {e}")))?;
    let line_items = PaymentsHttpLineItemSource::new(
        settings.payment_api_url.clone(),
        settings.payment_secret_key.clone(),
        settings.request_timeout,
    )
    .map_err(|e| io::Error::other(format!("payment client construction failed: {e}")))?;

    let service = WebhookReceiverService::new(WebhookReceiverPorts {
        processed_events: Arc::new(InMemorySeenStore::new()),
        fulfilled_sessions: Arc::new(InMemorySeenStore::new()),
        line_items: Arc::new(line_items),
        catalog: Arc::new(catalog),
        metrics: build_webhook_metrics(config)?,
    });
    Ok(Arc::new(service))
}

/// Build the shared HTTP state around the receiver port.
pub(super) fn build_http_state(
    config: &ServerConfig,
    webhooks: Arc<dyn WebhookReceiver>,
) -> web::Data<HttpState> {
    let signatures = SignatureVerifier::new(
        config.settings.webhook_secret.clone(),
        config.settings.signature_tolerance,
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(signatures, webhooks))
}
