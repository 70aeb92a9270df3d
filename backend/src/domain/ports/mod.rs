//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_repository;
mod line_item_source;
mod seen_store;
mod webhook_metrics;
mod webhook_receiver;

#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{CatalogProduct, CatalogRepository, CatalogRepositoryError};
#[cfg(test)]
pub use line_item_source::MockLineItemSource;
pub use line_item_source::{LineItemSource, LineItemSourceError, MAX_LINE_ITEMS};
#[cfg(test)]
pub use seen_store::MockSeenStore;
pub use seen_store::{SeenStore, SeenStoreError};
pub use webhook_metrics::{NoOpWebhookMetrics, WebhookMetrics, WebhookMetricsError};
#[cfg(test)]
pub use webhook_receiver::MockWebhookReceiver;
pub use webhook_receiver::{FulfilmentSummary, ReceiptOutcome, WebhookReceiver};
