//! Payment-provider outbound adapter.
//!
//! Lists checkout-session line items from a Stripe-style REST API for the
//! `LineItemSource` port.

mod dto;
mod http_line_items;

pub use http_line_items::PaymentsHttpLineItemSource;
