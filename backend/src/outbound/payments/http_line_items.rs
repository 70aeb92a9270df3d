//! Reqwest-backed line-item source.
//!
//! `GET {base}/v1/checkout/sessions/{id}/line_items?limit=100` with the
//! secret key as bearer credential. Listings beyond one page are truncated
//! with a warning; no further pages are requested.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::warn;
use zeroize::Zeroizing;

use super::dto::{LineItemDto, LineItemListDto};
use crate::domain::LineItem;
use crate::domain::ports::{LineItemSource, LineItemSourceError, MAX_LINE_ITEMS};
use crate::outbound::http_support::{base_url_with_segments, body_preview};

/// Line-item source backed by the payment provider's REST API.
pub struct PaymentsHttpLineItemSource {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl PaymentsHttpLineItemSource {
    /// Build a source. `timeout` of `None` keeps reqwest's default.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        secret_key: Zeroizing<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
            secret_key,
        })
    }
}

#[async_trait]
impl LineItemSource for PaymentsHttpLineItemSource {
    async fn list_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<LineItem>, LineItemSourceError> {
        let url = base_url_with_segments(
            &self.base_url,
            &["v1", "checkout", "sessions", session_id, "line_items"],
        )
        .ok_or_else(|| {
            LineItemSourceError::transport(format!(
                "payment API URL {} cannot carry a path",
                self.base_url
            ))
        })?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.as_str())
            .query(&[("limit", MAX_LINE_ITEMS)])
            .send()
            .await
            .map_err(|error| LineItemSourceError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| LineItemSourceError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(LineItemSourceError::unexpected_status(
                status.as_u16(),
                body_preview(body.as_ref()),
            ));
        }

        let listing: LineItemListDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            LineItemSourceError::decode(format!("invalid line item listing: {error}"))
        })?;
        if listing.has_more {
            warn!(
                session_id,
                limit = MAX_LINE_ITEMS,
                "session has more line items than one page; remainder ignored"
            );
        }
        Ok(listing
            .data
            .into_iter()
            .map(LineItemDto::into_line_item)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source(server: &MockServer) -> PaymentsHttpLineItemSource {
        PaymentsHttpLineItemSource::new(
            Url::parse(&server.uri()).expect("server uri"),
            Zeroizing::new("sk_test_123".to_owned()),
            None,
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn lists_items_with_limit_and_secret_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/checkout/sessions/cs_1/line_items"))
            .and(query_param("limit", "100"))
            .and(header("authorization", "Bearer sk_test_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    { "id": "li_1", "description": "Widget", "quantity": 2, "price": { "id": "price_w" } },
                    { "id": "li_2", "description": "Gadget", "quantity": "1", "price": { "id": "price_g" } }
                ],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = source(&server)
            .await
            .list_line_items("cs_1")
            .await
            .expect("listing succeeds");

        let names: Vec<_> = items
            .iter()
            .map(|item| (item.description.as_deref(), item.quantity))
            .collect();
        assert_eq!(names, vec![(Some("Widget"), Some(2)), (Some("Gadget"), Some(1))]);
    }

    #[tokio::test]
    async fn listing_with_more_pages_returns_first_page_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/checkout/sessions/cs_big/line_items"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    { "id": "li_1", "description": "Widget", "quantity": 1, "price": "price_w" }
                ],
                "has_more": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = source(&server)
            .await
            .list_line_items("cs_big")
            .await
            .expect("truncated listing still succeeds");

        assert_eq!(
            items,
            vec![LineItem {
                description: Some("Widget".to_owned()),
                quantity: Some(1),
                price_id: Some("price_w".to_owned()),
            }]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/checkout/sessions/cs_1/line_items"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"error\":{\"message\":\"bad key\"}}"),
            )
            .mount(&server)
            .await;

        let err = source(&server)
            .await
            .list_line_items("cs_1")
            .await
            .expect_err("listing fails");

        match err {
            LineItemSourceError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_listing_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = source(&server)
            .await
            .list_line_items("cs_1")
            .await
            .expect_err("listing fails");

        assert!(matches!(err, LineItemSourceError::Decode { .. }));
    }
}
