//! Port for recording webhook delivery outcomes.
//!
//! Lets the receiver report what happened to each delivery without depending
//! on a metrics backend. Recording failures are logged by the caller and
//! never fail a delivery.

use async_trait::async_trait;

use super::{ReceiptOutcome, define_port_error};

define_port_error! {
    /// Errors exposed when recording webhook metrics.
    pub enum WebhookMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "webhook metrics exporter failed: {message}",
    }
}

/// Metrics recording port for webhook deliveries.
#[async_trait]
pub trait WebhookMetrics: Send + Sync {
    /// Record an acknowledged delivery.
    async fn record_receipt(&self, outcome: &ReceiptOutcome) -> Result<(), WebhookMetricsError>;

    /// Record a delivery that failed and was left for redelivery.
    async fn record_failure(&self) -> Result<(), WebhookMetricsError>;
}

/// Recorder used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpWebhookMetrics;

#[async_trait]
impl WebhookMetrics for NoOpWebhookMetrics {
    async fn record_receipt(&self, _outcome: &ReceiptOutcome) -> Result<(), WebhookMetricsError> {
        Ok(())
    }

    async fn record_failure(&self) -> Result<(), WebhookMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_receipts_and_failures() {
        let metrics = NoOpWebhookMetrics;
        assert!(
            metrics
                .record_receipt(&ReceiptOutcome::DuplicateEvent)
                .await
                .is_ok()
        );
        assert!(metrics.record_failure().await.is_ok());
    }

    #[test]
    fn export_error_formats_message() {
        let err = WebhookMetricsError::export("registry closed");
        assert_eq!(
            err.to_string(),
            "webhook metrics exporter failed: registry closed"
        );
    }
}
