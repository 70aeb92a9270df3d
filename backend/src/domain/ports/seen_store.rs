//! Port for the "already processed" sets used to de-duplicate deliveries.
//!
//! Two independent instances back the receiver: one keyed by event id, one
//! keyed by checkout session id. The contract is "first observer wins":
//! once an id is marked, later lookups report it as seen. `contains` followed
//! by `mark` is not atomic; an adapter backed by an external store with an
//! atomic check-and-set can replace the in-memory one without changing
//! callers.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by seen-set adapters.
    pub enum SeenStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } => "seen store unavailable: {message}",
    }
}

/// Set of identifiers that have already been processed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether `id` was previously marked.
    async fn contains(&self, id: &str) -> Result<bool, SeenStoreError>;

    /// Record `id` as processed. Marking twice is a no-op.
    async fn mark(&self, id: &str) -> Result<(), SeenStoreError>;
}
