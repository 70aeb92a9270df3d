//! Prometheus adapter for webhook delivery outcomes.
//!
//! # Metric Specification
//!
//! - **Name**: `stocksync_webhook_events_total`
//! - **Type**: Counter
//! - **Labels**:
//!   - `outcome`: `duplicate_event`, `duplicate_session`, `payment_pending`,
//!     `fulfilled`, `ignored`, or `failed`

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{ReceiptOutcome, WebhookMetrics, WebhookMetricsError};

const FAILED: &str = "failed";

/// Prometheus-backed webhook metrics recorder.
pub struct PrometheusWebhookMetrics {
    events_total: CounterVec,
}

impl PrometheusWebhookMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let events_total = CounterVec::new(
            Opts::new(
                "stocksync_webhook_events_total",
                "Webhook deliveries by processing outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(events_total.clone()))?;
        Ok(Self { events_total })
    }

    fn record(&self, outcome: &str) {
        self.events_total.with_label_values(&[outcome]).inc();
    }
}

#[async_trait]
impl WebhookMetrics for PrometheusWebhookMetrics {
    async fn record_receipt(&self, outcome: &ReceiptOutcome) -> Result<(), WebhookMetricsError> {
        self.record(outcome.label());
        Ok(())
    }

    async fn record_failure(&self) -> Result<(), WebhookMetricsError> {
        self.record(FAILED);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FulfilmentSummary;

    fn metrics() -> (Registry, PrometheusWebhookMetrics) {
        let registry = Registry::new();
        let metrics =
            PrometheusWebhookMetrics::new(&registry).expect("metric registration should succeed");
        (registry, metrics)
    }

    #[test]
    fn registers_counter_with_registry() {
        let (registry, metrics) = metrics();
        metrics.record("fulfilled");

        assert!(
            registry
                .gather()
                .iter()
                .any(|family| family.name() == "stocksync_webhook_events_total"),
            "metric should be registered"
        );
    }

    #[test]
    fn double_registration_fails() {
        let (registry, _metrics) = metrics();
        assert!(PrometheusWebhookMetrics::new(&registry).is_err());
    }

    #[tokio::test]
    async fn receipts_are_counted_by_label() {
        let (_registry, metrics) = metrics();
        let fulfilled = ReceiptOutcome::Fulfilled(FulfilmentSummary::default());
        metrics.record_receipt(&fulfilled).await.expect("record");
        metrics.record_receipt(&fulfilled).await.expect("record");
        metrics
            .record_receipt(&ReceiptOutcome::DuplicateEvent)
            .await
            .expect("record");

        let count = |label: &str| metrics.events_total.with_label_values(&[label]).get() as u64;
        assert_eq!(count("fulfilled"), 2);
        assert_eq!(count("duplicate_event"), 1);
    }

    #[tokio::test]
    async fn failures_use_failed_label() {
        let (_registry, metrics) = metrics();
        metrics.record_failure().await.expect("record");

        assert_eq!(
            metrics.events_total.with_label_values(&[FAILED]).get() as u64,
            1
        );
    }
}
