//! Domain primitives, services, and ports.
//!
//! Purpose: model payment events, checkout sessions, and inventory
//! decrements independently of HTTP or the concrete catalog and payment
//! providers. Adapters depend on this module; it depends on none of them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - WebhookEvent, CheckoutSession, LineItem: provider data after decoding.
//! - InventoryUpdater: floored decrement against a `CatalogRepository`.
//! - WebhookReceiverService: idempotent event handling behind the
//!   `WebhookReceiver` port.

pub mod checkout;
pub mod error;
pub mod inventory_updater;
pub mod ports;
pub mod trace_id;
pub mod webhook_receiver;

pub use self::checkout::{
    CHECKOUT_SESSION_COMPLETED, CheckoutSession, CheckoutSessionError, EventKind, LineItem,
    MalformedLineItem, PaymentStatus, PurchasedItem, WebhookEvent,
};
pub use self::error::{Error, ErrorCode};
pub use self::inventory_updater::{
    DecrementOutcome, InventoryError, InventoryUpdater, floored_decrement,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::webhook_receiver::{WebhookReceiverPorts, WebhookReceiverService};
