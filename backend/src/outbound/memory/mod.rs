//! In-process adapters for single-instance deployments and tests.

mod seen_set;

pub use seen_set::InMemorySeenStore;
