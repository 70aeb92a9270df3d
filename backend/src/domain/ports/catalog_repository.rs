//! Driven port for the product catalog (content-management backend).
//!
//! The catalog is addressed by product name for lookups and by its opaque
//! `documentId` for writes. Adapters normalise whatever response shape the
//! backend produces into [`CatalogProduct`]; numeric validation of the
//! inventory value is left to the domain.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// Product record as returned by a catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    /// Opaque stable identifier used to address writes.
    pub document_id: Option<String>,
    /// Human-readable name the lookup matched on.
    pub name: String,
    /// Raw stock value; `Value::Null` when the catalog omitted it.
    pub inventory: Value,
}

define_port_error! {
    /// Errors surfaced by catalog adapters.
    pub enum CatalogRepositoryError {
        /// The catalog refused the credential (HTTP 403).
        PermissionDenied { status: u16, body: String } =>
            "catalog denied access (status {status}); check that the API token may read and update products: {body}",
        /// The product vanished between lookup and write (HTTP 404 on update).
        WriteNotFound { status: u16, body: String } =>
            "catalog product not found at write time (status {status}): {body}",
        /// Any other non-success response.
        UnexpectedStatus { status: u16, body: String } =>
            "catalog responded with status {status}: {body}",
        /// The request never produced a response.
        Transport { message: String } =>
            "catalog transport failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "catalog response decode failed: {message}",
    }
}

/// Port for reading and updating product stock levels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find the first product whose name matches `name` exactly.
    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CatalogProduct>, CatalogRepositoryError>;

    /// Overwrite the stock level of the product identified by `document_id`.
    async fn update_inventory(
        &self,
        document_id: &str,
        inventory: u64,
    ) -> Result<(), CatalogRepositoryError>;
}
