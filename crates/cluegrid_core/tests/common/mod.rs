#![allow(dead_code)]

use async_trait::async_trait;
use cluegrid_core::{
    BoardId, BoardSession, DocumentStore, MemoryDocumentStore, MemorySink, ReferenceSink,
    RemoteDocument, SinkError, StoreResult, SyncConfig, BOARDS_COLLECTION,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Memory store with injectable latency and id collisions.
#[derive(Default)]
pub struct ControlledStore {
    pub inner: MemoryDocumentStore,
    put_delays: Mutex<VecDeque<Duration>>,
    get_delay: Mutex<Option<Duration>>,
    every_id_taken: AtomicBool,
    gets: AtomicUsize,
}

impl ControlledStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Delays the next `put` calls, one entry per call.
    pub fn delay_puts(&self, delays: &[Duration]) {
        self.put_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn delay_gets(&self, delay: Duration) {
        *self.get_delay.lock().unwrap() = Some(delay);
    }

    pub fn report_every_id_taken(&self, taken: bool) {
        self.every_id_taken.store(taken, Ordering::SeqCst);
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub async fn document(&self, id: &BoardId) -> Option<RemoteDocument> {
        self.inner.get(BOARDS_COLLECTION, id).await.unwrap()
    }
}

#[async_trait]
impl DocumentStore for ControlledStore {
    async fn get(&self, collection: &str, id: &BoardId) -> StoreResult<Option<RemoteDocument>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let delay = *self.get_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.every_id_taken.load(Ordering::SeqCst) {
            return Ok(Some(RemoteDocument::from_board(&Default::default(), 0, 0)));
        }
        self.inner.get(collection, id).await
    }

    async fn put(
        &self,
        collection: &str,
        id: &BoardId,
        document: &RemoteDocument,
    ) -> StoreResult<()> {
        let delay = self.put_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.put(collection, id, document).await
    }
}

/// Sink that always refuses the reference.
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ReferenceSink for FailingSink {
    async fn write(&self, _text: &str) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError("clipboard permission denied".to_string()))
    }
}

pub fn session_with(
    store: Arc<dyn DocumentStore>,
    config: SyncConfig,
) -> (BoardSession, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let session = BoardSession::new(config, store, sink.clone());
    (session, sink)
}

pub fn session(store: Arc<dyn DocumentStore>) -> (BoardSession, Arc<MemorySink>) {
    session_with(store, SyncConfig::default())
}

pub async fn stored(store: &MemoryDocumentStore, id: &BoardId) -> Option<RemoteDocument> {
    store.get(BOARDS_COLLECTION, id).await.unwrap()
}
