//! Floored inventory decrements against the product catalog.
//!
//! One call resolves a product by name, reads its stock, and writes back
//! `max(0, stock - quantity)` keyed by the product's `documentId`. Products
//! already at or below zero are left untouched. There is no retry here; any
//! failure propagates so the whole delivery can be redelivered.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::ports::{CatalogProduct, CatalogRepository, CatalogRepositoryError};

/// Result of one successful decrement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Stock was written back.
    Updated {
        document_id: String,
        previous: u64,
        current: u64,
    },
    /// Stock was already at or below zero; no write was issued.
    AlreadyDepleted { document_id: String },
}

/// Failures that abort the current delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("product \"{name}\" not found in catalog")]
    ProductNotFound { name: String },
    #[error("product \"{name}\" has invalid catalog state: {reason}")]
    InvalidState { name: String, reason: String },
    #[error(transparent)]
    Catalog(#[from] CatalogRepositoryError),
}

impl InventoryError {
    /// Machine-readable failure kind for logs and error details.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProductNotFound { .. } => "catalog_not_found",
            Self::InvalidState { .. } => "catalog_invalid_state",
            Self::Catalog(CatalogRepositoryError::PermissionDenied { .. }) => {
                "catalog_permission_denied"
            }
            Self::Catalog(CatalogRepositoryError::WriteNotFound { .. }) => {
                "catalog_write_not_found"
            }
            Self::Catalog(CatalogRepositoryError::UnexpectedStatus { .. }) => {
                "catalog_unexpected_status"
            }
            Self::Catalog(CatalogRepositoryError::Transport { .. }) => "catalog_transport",
            Self::Catalog(CatalogRepositoryError::Decode { .. }) => "catalog_decode",
        }
    }
}

/// `max(0, current - quantity)`.
///
/// # Examples
/// ```
/// use stocksync::domain::floored_decrement;
///
/// assert_eq!(floored_decrement(5, 2), 3);
/// assert_eq!(floored_decrement(1, 4), 0);
/// ```
pub fn floored_decrement(current: u64, quantity: u64) -> u64 {
    current.saturating_sub(quantity)
}

/// Interpret a catalog stock value. Integral JSON numbers only; fractional,
/// string, or missing values are rejected.
fn stock_level(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .or_else(|| {
            value
                .as_f64()
                .filter(|level| level.is_finite() && level.fract() == 0.0)
                .map(|level| level as i128)
        })
}

/// Stateless client applying decrements through a [`CatalogRepository`].
#[derive(Clone)]
pub struct InventoryUpdater {
    catalog: Arc<dyn CatalogRepository>,
}

impl InventoryUpdater {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Decrement the stock of `product_name` by `quantity`, flooring at zero.
    ///
    /// # Errors
    /// - [`InventoryError::ProductNotFound`] when no product has that exact name.
    /// - [`InventoryError::InvalidState`] when the stock is not an integer,
    ///   exceeds `u64::MAX`, or the record has no `documentId`.
    /// - [`InventoryError::Catalog`] for lookup or write failures.
    pub async fn apply_decrement(
        &self,
        product_name: &str,
        quantity: u64,
    ) -> Result<DecrementOutcome, InventoryError> {
        let product = self
            .catalog
            .find_by_name(product_name)
            .await?
            .ok_or_else(|| InventoryError::ProductNotFound {
                name: product_name.to_owned(),
            })?;
        let CatalogProduct {
            document_id,
            inventory,
            ..
        } = product;

        let level = stock_level(&inventory).ok_or_else(|| InventoryError::InvalidState {
            name: product_name.to_owned(),
            reason: format!("inventory is not an integer: {inventory}"),
        })?;
        let document_id = document_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| InventoryError::InvalidState {
                name: product_name.to_owned(),
                reason: "record has no documentId".to_owned(),
            })?;

        if level <= 0 {
            debug!(product = product_name, level, "stock already depleted; skipping write");
            return Ok(DecrementOutcome::AlreadyDepleted { document_id });
        }
        let previous = u64::try_from(level).map_err(|_| InventoryError::InvalidState {
            name: product_name.to_owned(),
            reason: format!("inventory {inventory} exceeds the writable range"),
        })?;

        let current = floored_decrement(previous, quantity);
        self.catalog
            .update_inventory(&document_id, current)
            .await?;
        info!(
            product = product_name,
            document_id = %document_id,
            previous,
            current,
            quantity,
            "inventory decremented"
        );
        Ok(DecrementOutcome::Updated {
            document_id,
            previous,
            current,
        })
    }
}
