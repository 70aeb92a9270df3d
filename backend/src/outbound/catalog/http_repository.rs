//! Reqwest-backed catalog adapter.
//!
//! Owns transport details only: URL and query construction, bearer
//! authentication, status mapping, and decoding into [`CatalogProduct`].
//! Stock arithmetic and validation stay in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{InventoryUpdateDto, ProductListDto};
use crate::domain::ports::{CatalogProduct, CatalogRepository, CatalogRepositoryError};
use crate::outbound::http_support::{base_url_with_segments, body_preview};

/// Catalog adapter addressing `{base}/api/products`.
pub struct CatalogHttpRepository {
    client: Client,
    base_url: Url,
    token: Zeroizing<String>,
}

impl CatalogHttpRepository {
    /// Build an adapter. `timeout` of `None` keeps reqwest's default (no
    /// overall request timeout).
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        token: Zeroizing<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
            token,
        })
    }

    fn products_url(&self, document_id: Option<&str>) -> Result<Url, CatalogRepositoryError> {
        let mut segments = vec!["api", "products"];
        segments.extend(document_id);
        base_url_with_segments(&self.base_url, &segments).ok_or_else(|| {
            CatalogRepositoryError::transport(format!(
                "catalog URL {} cannot carry a path",
                self.base_url
            ))
        })
    }
}

#[async_trait]
impl CatalogRepository for CatalogHttpRepository {
    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CatalogProduct>, CatalogRepositoryError> {
        let url = self.products_url(None)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("filters[name][$eq]", name),
                ("fields[0]", "name"),
                ("fields[1]", "inventory"),
                ("fields[2]", "documentId"),
                ("pagination[limit]", "1"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), false));
        }

        let listing: ProductListDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            CatalogRepositoryError::decode(format!("invalid product listing: {error}"))
        })?;
        Ok(listing.into_first_product(name))
    }

    async fn update_inventory(
        &self,
        document_id: &str,
        inventory: u64,
    ) -> Result<(), CatalogRepositoryError> {
        let url = self.products_url(Some(document_id))?;
        let response = self
            .client
            .put(url)
            .bearer_auth(self.token.as_str())
            .json(&InventoryUpdateDto::new(inventory))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref(), true))
    }
}

fn map_transport_error(error: reqwest::Error) -> CatalogRepositoryError {
    CatalogRepositoryError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8], is_write: bool) -> CatalogRepositoryError {
    let code = status.as_u16();
    let preview = body_preview(body);
    match status {
        StatusCode::FORBIDDEN => CatalogRepositoryError::permission_denied(code, preview),
        StatusCode::NOT_FOUND if is_write => CatalogRepositoryError::write_not_found(code, preview),
        _ => CatalogRepositoryError::unexpected_status(code, preview),
    }
}
