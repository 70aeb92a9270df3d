//! In-memory [`SeenStore`] backed by a `HashSet` behind an async `RwLock`.
//!
//! Unbounded and process-local: ids are never evicted and are lost on
//! restart, after which the provider's redeliveries are processed again.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{SeenStore, SeenStoreError};

/// Process-local seen set.
#[derive(Debug, Default)]
pub struct InMemorySeenStore {
    ids: RwLock<HashSet<String>>,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids recorded so far.
    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ids.read().await.is_empty()
    }
}

#[async_trait]
impl SeenStore for InMemorySeenStore {
    async fn contains(&self, id: &str) -> Result<bool, SeenStoreError> {
        Ok(self.ids.read().await.contains(id))
    }

    async fn mark(&self, id: &str) -> Result<(), SeenStoreError> {
        self.ids.write().await.insert(id.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn marked_ids_are_reported_as_seen() {
        let store = InMemorySeenStore::new();
        assert!(!store.contains("evt_1").await.expect("contains"));

        store.mark("evt_1").await.expect("mark");

        assert!(store.contains("evt_1").await.expect("contains"));
        assert!(!store.contains("evt_2").await.expect("contains"));
    }

    #[tokio::test]
    async fn marking_twice_is_a_no_op() {
        let store = InMemorySeenStore::new();
        store.mark("cs_1").await.expect("mark");
        store.mark("cs_1").await.expect("mark again");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_marks_are_all_recorded() {
        let store = Arc::new(InMemorySeenStore::new());
        let handles: Vec<_> = (0..32)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.mark(&format!("evt_{n}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("task joins").expect("mark");
        }
        assert_eq!(store.len().await, 32);
    }
}
