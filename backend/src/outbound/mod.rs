//! Outbound adapters implementing domain ports for external systems.
//!
//! - **catalog**: reqwest client for the Strapi-style product catalog
//! - **payments**: reqwest client listing checkout-session line items
//! - **memory**: in-process seen sets used for de-duplication
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and wire formats. They contain no
//! business logic.

pub mod catalog;
pub(crate) mod http_support;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod payments;
