//! Idempotent application of payment webhooks to catalog inventory.
//!
//! Per delivery the receiver walks `received → verified → {deduped-skip |
//! dispatched} → {acknowledged | failed}` (verification happens in the HTTP
//! adapter before [`WebhookReceiver::receive`] is called):
//!
//! 1. An event id already in the processed-events set is acknowledged
//!    without further work.
//! 2. `checkout.session.completed` events are fulfilled at most once per
//!    session id. Unpaid sessions are acknowledged without mutation.
//! 3. Line items are applied in provider order. Malformed items are skipped;
//!    the first catalog failure aborts the rest of the batch.
//! 4. Only a dispatch that completes marks the event id. A failed dispatch
//!    leaves it unmarked so the provider's redelivery retries the event.
//!
//! `contains` and `mark` are separate calls, so overlapping deliveries of the
//! same id can both pass the check. The in-memory sets are a development
//! stand-in for an external store with atomic check-and-set.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::ports::{
    CatalogRepository, FulfilmentSummary, LineItemSource, LineItemSourceError, ReceiptOutcome,
    SeenStore, SeenStoreError, WebhookMetrics, WebhookReceiver,
};
use super::{
    CheckoutSession, CheckoutSessionError, DecrementOutcome, Error, EventKind, InventoryError,
    InventoryUpdater, LineItem, WebhookEvent,
};

/// Port bundle required by [`WebhookReceiverService`].
#[derive(Clone)]
pub struct WebhookReceiverPorts {
    /// Event ids that completed dispatch.
    pub processed_events: Arc<dyn SeenStore>,
    /// Checkout session ids whose inventory was applied.
    pub fulfilled_sessions: Arc<dyn SeenStore>,
    pub line_items: Arc<dyn LineItemSource>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub metrics: Arc<dyn WebhookMetrics>,
}

/// Concrete [`WebhookReceiver`] applying checkout sessions to inventory.
pub struct WebhookReceiverService {
    processed_events: Arc<dyn SeenStore>,
    fulfilled_sessions: Arc<dyn SeenStore>,
    line_items: Arc<dyn LineItemSource>,
    inventory: InventoryUpdater,
    metrics: Arc<dyn WebhookMetrics>,
}

impl WebhookReceiverService {
    pub fn new(ports: WebhookReceiverPorts) -> Self {
        let WebhookReceiverPorts {
            processed_events,
            fulfilled_sessions,
            line_items,
            catalog,
            metrics,
        } = ports;
        Self {
            processed_events,
            fulfilled_sessions,
            line_items,
            inventory: InventoryUpdater::new(catalog),
            metrics,
        }
    }

    async fn process(&self, event: &WebhookEvent) -> Result<ReceiptOutcome, Error> {
        if self
            .processed_events
            .contains(&event.id)
            .await
            .map_err(map_seen_store_error)?
        {
            debug!("event already processed; acknowledging");
            return Ok(ReceiptOutcome::DuplicateEvent);
        }

        let outcome = self.dispatch(event).await?;

        self.processed_events
            .mark(&event.id)
            .await
            .map_err(map_seen_store_error)?;
        Ok(outcome)
    }

    async fn dispatch(&self, event: &WebhookEvent) -> Result<ReceiptOutcome, Error> {
        match event.kind() {
            EventKind::CheckoutSessionCompleted => self.fulfil_checkout(event).await,
            EventKind::Other => {
                info!("event kind carries no inventory work");
                Ok(ReceiptOutcome::Ignored {
                    event_type: event.event_type.clone(),
                })
            }
        }
    }

    async fn fulfil_checkout(&self, event: &WebhookEvent) -> Result<ReceiptOutcome, Error> {
        let session = CheckoutSession::from_event(event).map_err(map_session_error)?;

        if self
            .fulfilled_sessions
            .contains(&session.id)
            .await
            .map_err(map_seen_store_error)?
        {
            debug!(session_id = %session.id, "session already fulfilled; skipping");
            return Ok(ReceiptOutcome::DuplicateSession {
                session_id: session.id,
            });
        }

        if !session.requires_fulfilment() {
            let payment_status = session
                .payment_status
                .as_ref()
                .map(|status| status.as_str().to_owned())
                .unwrap_or_default();
            info!(
                session_id = %session.id,
                payment_status = %payment_status,
                "session not paid; inventory untouched"
            );
            return Ok(ReceiptOutcome::PaymentPending {
                session_id: session.id,
                payment_status,
            });
        }

        let items = self
            .line_items
            .list_line_items(&session.id)
            .await
            .map_err(map_line_item_error)?;
        let summary = self.apply_line_items(&session.id, &items).await?;

        self.fulfilled_sessions
            .mark(&session.id)
            .await
            .map_err(map_seen_store_error)?;
        info!(
            session_id = %session.id,
            updated = summary.updated,
            already_depleted = summary.already_depleted,
            skipped = summary.skipped,
            "session fulfilled"
        );
        Ok(ReceiptOutcome::Fulfilled(summary))
    }

    async fn apply_line_items(
        &self,
        session_id: &str,
        items: &[LineItem],
    ) -> Result<FulfilmentSummary, Error> {
        let mut summary = FulfilmentSummary {
            session_id: session_id.to_owned(),
            ..FulfilmentSummary::default()
        };
        for (position, item) in items.iter().enumerate() {
            let purchased = match item.validate() {
                Ok(purchased) => purchased,
                Err(defect) => {
                    warn!(
                        position,
                        description = ?item.description,
                        quantity = ?item.quantity,
                        reason = %defect,
                        "skipping malformed line item"
                    );
                    summary.skipped += 1;
                    continue;
                }
            };
            let outcome = self
                .inventory
                .apply_decrement(&purchased.product_name, purchased.quantity)
                .await
                .map_err(map_inventory_error)?;
            match outcome {
                DecrementOutcome::Updated { .. } => summary.updated += 1,
                DecrementOutcome::AlreadyDepleted { .. } => summary.already_depleted += 1,
            }
        }
        Ok(summary)
    }

    async fn record(&self, result: &Result<ReceiptOutcome, Error>) {
        let recorded = match result {
            Ok(outcome) => self.metrics.record_receipt(outcome).await,
            Err(_) => self.metrics.record_failure().await,
        };
        if let Err(err) = recorded {
            warn!(error = %err, "failed to record webhook metrics");
        }
    }
}

#[async_trait]
impl WebhookReceiver for WebhookReceiverService {
    async fn receive(&self, event: WebhookEvent) -> Result<ReceiptOutcome, Error> {
        let span = info_span!(
            "webhook_event",
            event_id = %event.id,
            event_type = %event.event_type
        );
        async {
            let result = self.process(&event).await;
            match &result {
                Ok(outcome) => debug!(outcome = outcome.label(), "event acknowledged"),
                Err(err) => error!(
                    error = %err,
                    details = ?err.details(),
                    "event processing failed; left unmarked for redelivery"
                ),
            }
            self.record(&result).await;
            result
        }
        .instrument(span)
        .await
    }
}

fn map_seen_store_error(err: SeenStoreError) -> Error {
    Error::internal(err.to_string()).with_details(json!({ "kind": "seen_store" }))
}

fn map_session_error(err: CheckoutSessionError) -> Error {
    Error::internal(format!("malformed checkout session: {err}"))
        .with_details(json!({ "kind": "malformed_session" }))
}

fn map_line_item_error(err: LineItemSourceError) -> Error {
    Error::internal(err.to_string()).with_details(json!({ "kind": "payment_provider" }))
}

fn map_inventory_error(err: InventoryError) -> Error {
    Error::internal(err.to_string()).with_details(json!({ "kind": err.kind() }))
}
