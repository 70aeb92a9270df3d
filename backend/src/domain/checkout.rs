//! Payment-provider events, checkout sessions, and purchased line items.
//!
//! Events arrive as signed JSON from the provider. Only
//! `checkout.session.completed` carries work for this service; the session it
//! wraps is extracted lazily during dispatch so that a malformed session
//! object fails the delivery (and leaves it eligible for redelivery) instead
//! of being rejected as a bad request.

use serde_json::Value;
use thiserror::Error;

/// Event type emitted when a checkout completes.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Verified notification from the payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    /// Provider-issued unique identifier, stable across redeliveries.
    pub id: String,
    /// Provider event type, e.g. `checkout.session.completed`.
    pub event_type: String,
    /// Kind-specific payload (`{"object": {...}}` for checkout events).
    pub data: Value,
}

/// Event kinds the receiver dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CheckoutSessionCompleted,
    Other,
}

impl WebhookEvent {
    /// Classify the event type.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use stocksync::domain::{EventKind, WebhookEvent};
    ///
    /// let event = WebhookEvent {
    ///     id: "evt_1".into(),
    ///     event_type: "invoice.paid".into(),
    ///     data: json!({}),
    /// };
    /// assert_eq!(event.kind(), EventKind::Other);
    /// ```
    pub fn kind(&self) -> EventKind {
        if self.event_type == CHECKOUT_SESSION_COMPLETED {
            EventKind::CheckoutSessionCompleted
        } else {
            EventKind::Other
        }
    }
}

/// Payment status reported on a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Other(String),
}

impl PaymentStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "paid" => Self::Paid,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "paid",
            Self::Other(other) => other.as_str(),
        }
    }
}

/// Reasons a checkout event cannot yield a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutSessionError {
    #[error("event data has no session object")]
    MissingObject,
    #[error("session object has no id")]
    MissingId,
}

/// Checkout transaction referenced by a `checkout.session.completed` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: Option<PaymentStatus>,
}

impl CheckoutSession {
    /// Extract the session from an event's `data.object`.
    ///
    /// # Errors
    /// Fails when `data.object` is absent or carries no string `id`.
    ///
    /// A `null` status counts as unreported. A present status that is not a
    /// string is kept verbatim as [`PaymentStatus::Other`].
    pub fn from_event(event: &WebhookEvent) -> Result<Self, CheckoutSessionError> {
        let object = event
            .data
            .get("object")
            .filter(|object| object.is_object())
            .ok_or(CheckoutSessionError::MissingObject)?;
        let id = object
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(CheckoutSessionError::MissingId)?;
        let payment_status = match object.get("payment_status") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(PaymentStatus::parse(raw)),
            Some(other) => Some(PaymentStatus::Other(other.to_string())),
        };
        Ok(Self {
            id: id.to_owned(),
            payment_status,
        })
    }

    /// A session with no reported status is treated as settled; anything
    /// other than `paid` is informational only.
    pub fn requires_fulfilment(&self) -> bool {
        !matches!(&self.payment_status, Some(PaymentStatus::Other(_)))
    }
}

/// One purchased line as reported by the payment provider.
///
/// `quantity` is already coerced to an integer by the adapter; `None` means
/// the provider sent nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineItem {
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub price_id: Option<String>,
}

/// A line item that passed validation and may reach the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedItem {
    pub product_name: String,
    pub quantity: u64,
}

/// Line-item defects that skip the item without failing the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLineItem {
    #[error("line item has no product name")]
    BlankName,
    #[error("line item has no usable quantity")]
    MissingQuantity,
    #[error("line item quantity {quantity} is not positive")]
    NonPositiveQuantity { quantity: i64 },
}

impl LineItem {
    /// Validate the item for inventory processing.
    ///
    /// # Errors
    /// Returns [`MalformedLineItem`] for a blank name or a missing,
    /// zero, or negative quantity.
    pub fn validate(&self) -> Result<PurchasedItem, MalformedLineItem> {
        let product_name = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(MalformedLineItem::BlankName)?;
        let quantity = self.quantity.ok_or(MalformedLineItem::MissingQuantity)?;
        let quantity = u64::try_from(quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(MalformedLineItem::NonPositiveQuantity { quantity })?;
        Ok(PurchasedItem {
            product_name: product_name.to_owned(),
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn checkout_event(object: Value) -> WebhookEvent {
        WebhookEvent {
            id: "evt_1".to_owned(),
            event_type: CHECKOUT_SESSION_COMPLETED.to_owned(),
            data: json!({ "object": object }),
        }
    }

    fn item(description: Option<&str>, quantity: Option<i64>) -> LineItem {
        LineItem {
            description: description.map(str::to_owned),
            quantity,
            price_id: Some("price_1".to_owned()),
        }
    }

    #[rstest]
    #[case(CHECKOUT_SESSION_COMPLETED, EventKind::CheckoutSessionCompleted)]
    #[case("checkout.session.expired", EventKind::Other)]
    #[case("payment_intent.succeeded", EventKind::Other)]
    fn classifies_event_types(#[case] event_type: &str, #[case] expected: EventKind) {
        let event = WebhookEvent {
            id: "evt_1".to_owned(),
            event_type: event_type.to_owned(),
            data: json!({}),
        };
        assert_eq!(event.kind(), expected);
    }

    #[test]
    fn extracts_session_with_status() {
        let session =
            CheckoutSession::from_event(&checkout_event(json!({"id": "cs_1", "payment_status": "paid"})))
                .expect("session extracts");
        assert_eq!(session.id, "cs_1");
        assert_eq!(session.payment_status, Some(PaymentStatus::Paid));
        assert!(session.requires_fulfilment());
    }

    #[rstest]
    #[case(json!({"id": "cs_1"}), true)]
    #[case(json!({"id": "cs_1", "payment_status": "paid"}), true)]
    #[case(json!({"id": "cs_1", "payment_status": "unpaid"}), false)]
    #[case(json!({"id": "cs_1", "payment_status": "no_payment_required"}), false)]
    #[case(json!({"id": "cs_1", "payment_status": null}), true)]
    #[case(json!({"id": "cs_1", "payment_status": false}), false)]
    #[case(json!({"id": "cs_1", "payment_status": 5}), false)]
    #[case(json!({"id": "cs_1", "payment_status": {"x": 1}}), false)]
    fn only_absent_or_paid_status_requires_fulfilment(#[case] object: Value, #[case] expected: bool) {
        let session = CheckoutSession::from_event(&checkout_event(object)).expect("session extracts");
        assert_eq!(session.requires_fulfilment(), expected);
    }

    #[test]
    fn non_string_status_is_kept_verbatim() {
        let session = CheckoutSession::from_event(&checkout_event(
            json!({"id": "cs_1", "payment_status": false}),
        ))
        .expect("session extracts");
        assert_eq!(
            session.payment_status,
            Some(PaymentStatus::Other("false".to_owned()))
        );
    }

    #[test]
    fn rejects_event_without_object() {
        let event = WebhookEvent {
            id: "evt_1".to_owned(),
            event_type: CHECKOUT_SESSION_COMPLETED.to_owned(),
            data: json!({}),
        };
        assert_eq!(
            CheckoutSession::from_event(&event),
            Err(CheckoutSessionError::MissingObject)
        );
    }

    #[test]
    fn rejects_session_without_id() {
        let event = checkout_event(json!({"payment_status": "paid"}));
        assert_eq!(
            CheckoutSession::from_event(&event),
            Err(CheckoutSessionError::MissingId)
        );
    }

    #[test]
    fn validation_trims_product_name() {
        let purchased = item(Some("  Widget "), Some(2)).validate().expect("valid item");
        assert_eq!(
            purchased,
            PurchasedItem {
                product_name: "Widget".to_owned(),
                quantity: 2
            }
        );
    }

    #[rstest]
    #[case::missing_name(item(None, Some(1)), MalformedLineItem::BlankName)]
    #[case::blank_name(item(Some("   "), Some(1)), MalformedLineItem::BlankName)]
    #[case::missing_quantity(item(Some("Widget"), None), MalformedLineItem::MissingQuantity)]
    #[case::zero(item(Some("Widget"), Some(0)), MalformedLineItem::NonPositiveQuantity { quantity: 0 })]
    #[case::negative(item(Some("Widget"), Some(-3)), MalformedLineItem::NonPositiveQuantity { quantity: -3 })]
    fn malformed_items_are_reported(#[case] line: LineItem, #[case] expected: MalformedLineItem) {
        assert_eq!(line.validate(), Err(expected));
    }
}
