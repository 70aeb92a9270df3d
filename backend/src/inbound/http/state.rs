//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on the
//! signature verifier and the receiver port, and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::WebhookReceiver;

use super::signature::SignatureVerifier;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub signatures: SignatureVerifier,
    pub webhooks: Arc<dyn WebhookReceiver>,
}

impl HttpState {
    /// Construct state from its ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use async_trait::async_trait;
    /// use mockable::DefaultClock;
    /// use stocksync::domain::ports::{ReceiptOutcome, WebhookReceiver};
    /// use stocksync::domain::{Error, WebhookEvent};
    /// use stocksync::inbound::http::signature::SignatureVerifier;
    /// use stocksync::inbound::http::state::HttpState;
    /// use zeroize::Zeroizing;
    ///
    /// struct IgnoreAll;
    ///
    /// #[async_trait]
    /// impl WebhookReceiver for IgnoreAll {
    ///     async fn receive(&self, event: WebhookEvent) -> Result<ReceiptOutcome, Error> {
    ///         Ok(ReceiptOutcome::Ignored { event_type: event.event_type })
    ///     }
    /// }
    ///
    /// let verifier = SignatureVerifier::new(
    ///     Zeroizing::new("whsec_test".to_owned()),
    ///     Duration::from_secs(300),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(verifier, Arc::new(IgnoreAll));
    /// let _receiver = state.webhooks.clone();
    /// ```
    pub fn new(signatures: SignatureVerifier, webhooks: Arc<dyn WebhookReceiver>) -> Self {
        Self {
            signatures,
            webhooks,
        }
    }
}
