//! Prometheus-backed metrics adapters (feature `metrics`).

mod prometheus_webhooks;

pub use prometheus_webhooks::PrometheusWebhookMetrics;
