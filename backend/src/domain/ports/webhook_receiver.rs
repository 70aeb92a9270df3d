//! Driving port for handling one verified webhook event.

use async_trait::async_trait;

use crate::domain::{Error, WebhookEvent};

/// Counts produced by fulfilling one checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FulfilmentSummary {
    pub session_id: String,
    /// Items whose stock was written back.
    pub updated: usize,
    /// Items whose product was already at zero stock (no write issued).
    pub already_depleted: usize,
    /// Malformed items skipped without touching the catalog.
    pub skipped: usize,
}

/// Terminal result of an acknowledged delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptOutcome {
    /// The event id was already processed.
    DuplicateEvent,
    /// A fresh event referenced an already-fulfilled session.
    DuplicateSession { session_id: String },
    /// The session is not paid yet; nothing was mutated.
    PaymentPending {
        session_id: String,
        payment_status: String,
    },
    /// Inventory decrements were applied.
    Fulfilled(FulfilmentSummary),
    /// The event kind carries no work.
    Ignored { event_type: String },
}

impl ReceiptOutcome {
    /// Stable label used in acknowledgements and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DuplicateEvent => "duplicate_event",
            Self::DuplicateSession { .. } => "duplicate_session",
            Self::PaymentPending { .. } => "payment_pending",
            Self::Fulfilled(_) => "fulfilled",
            Self::Ignored { .. } => "ignored",
        }
    }
}

/// Use-case port invoked by the HTTP adapter after signature verification.
///
/// `Err` means the delivery failed and must stay eligible for redelivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookReceiver: Send + Sync {
    async fn receive(&self, event: WebhookEvent) -> Result<ReceiptOutcome, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReceiptOutcome::DuplicateEvent, "duplicate_event")]
    #[case(ReceiptOutcome::DuplicateSession { session_id: "cs_1".into() }, "duplicate_session")]
    #[case(
        ReceiptOutcome::PaymentPending { session_id: "cs_1".into(), payment_status: "unpaid".into() },
        "payment_pending"
    )]
    #[case(ReceiptOutcome::Fulfilled(FulfilmentSummary::default()), "fulfilled")]
    #[case(ReceiptOutcome::Ignored { event_type: "invoice.paid".into() }, "ignored")]
    fn labels_are_stable(#[case] outcome: ReceiptOutcome, #[case] expected: &str) {
        assert_eq!(outcome.label(), expected);
    }
}
