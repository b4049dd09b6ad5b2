//! Process-local document store.
//!
//! Used by tests and by the CLI when no database path is configured. Several
//! sessions sharing one `Arc<MemoryDocumentStore>` behave like clients of the
//! same remote store.

use crate::model::board::BoardId;
use crate::model::document::RemoteDocument;
use crate::repo::document_store::{DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

type DocumentKey = (String, BoardId);

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<DocumentKey, RemoteDocument>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing (or regaining) connectivity.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful `put` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.documents
            .lock()
            .await
            .keys()
            .filter(|(name, _)| name == collection)
            .count()
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &BoardId) -> StoreResult<Option<RemoteDocument>> {
        self.ensure_online()?;
        let documents = self.documents.lock().await;
        Ok(documents.get(&(collection.to_string(), id.clone())).cloned())
    }

    async fn put(
        &self,
        collection: &str,
        id: &BoardId,
        document: &RemoteDocument,
    ) -> StoreResult<()> {
        self.ensure_online()?;
        self.documents
            .lock()
            .await
            .insert((collection.to_string(), id.clone()), document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
