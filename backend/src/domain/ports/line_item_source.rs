//! Driven port for listing the line items of a checkout session.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::LineItem;

/// Upper bound on line items fetched per session; no pagination beyond it.
pub const MAX_LINE_ITEMS: u32 = 100;

define_port_error! {
    /// Errors surfaced while listing line items.
    pub enum LineItemSourceError {
        /// The request never produced a response.
        Transport { message: String } =>
            "payment provider transport failed: {message}",
        /// The provider answered with a non-success status.
        UnexpectedStatus { status: u16, body: String } =>
            "payment provider responded with status {status}: {body}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "payment provider response decode failed: {message}",
    }
}

/// Port for fetching the purchased items of a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LineItemSource: Send + Sync {
    /// List up to [`MAX_LINE_ITEMS`] items for `session_id`, in provider order.
    async fn list_line_items(&self, session_id: &str)
    -> Result<Vec<LineItem>, LineItemSourceError>;
}
