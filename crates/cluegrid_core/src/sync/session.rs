//! Board session: the context object UI collaborators hold.
//!
//! # Responsibility
//! - Own one `BoardStore` per session and expose its mutations.
//! - Run the pull path (`load_board_from_id`) and share path (`share_board`).
//! - Wire the push worker to local changes while a remote identity is bound.
//!
//! # Invariants
//! - Identity moves only `Unbound -> Bound(id)` (share or load success) and
//!   `Bound -> Unbound` (reset).
//! - The session lock is never held across an await point.
//! - Async operations capture the store epoch before suspending and discard
//!   their result if it moved, so nothing resurrects a board after reset.
//! - A pull is applied only if no local change landed during the fetch.

use crate::config::SyncConfig;
use crate::model::board::{Board, BoardError, BoardId, CellColor};
use crate::model::document::{now_epoch_ms, RemoteDocument, BOARDS_COLLECTION};
use crate::repo::document_store::DocumentStore;
use crate::service::board_store::{Binding, BoardObserver, BoardStore};
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::push::{PushHandle, PushStatus};
use crate::sync::share::{share_reference, Role};
use crate::sync::sink::{ReferenceSink, SinkError};
use log::{error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Result of a successful `share_board` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOutcome {
    pub board_id: BoardId,
    /// Text handed to the reference sink (link or bare id).
    pub reference: String,
    /// Whether this call created the remote document.
    pub created: bool,
    /// Set when the sink rejected the reference; the share itself stands.
    pub sink_warning: Option<SinkError>,
}

struct SessionInner {
    store: Mutex<BoardStore>,
    remote: Option<Arc<dyn DocumentStore>>,
    push: Option<PushHandle>,
    sink: Arc<dyn ReferenceSink>,
    share_gate: tokio::sync::Mutex<()>,
    config: SyncConfig,
}

/// Cloneable handle to one client's board session.
#[derive(Clone)]
pub struct BoardSession {
    inner: Arc<SessionInner>,
}

impl BoardSession {
    /// Creates a session synchronized with `remote`.
    ///
    /// Must be called inside a tokio runtime; the push worker is spawned here.
    pub fn new(
        config: SyncConfig,
        remote: Arc<dyn DocumentStore>,
        sink: Arc<dyn ReferenceSink>,
    ) -> Self {
        let push = PushHandle::spawn(remote.clone());
        let mut store = BoardStore::new();
        store.subscribe(Box::new(push.observer()));
        Self::from_parts(config, store, Some(remote), Some(push), sink)
    }

    /// Creates a session with no document store.
    ///
    /// Editing works normally; share and load fail with `RemoteUnavailable`.
    pub fn local_only(config: SyncConfig, sink: Arc<dyn ReferenceSink>) -> Self {
        Self::from_parts(config, BoardStore::new(), None, None, sink)
    }

    fn from_parts(
        config: SyncConfig,
        store: BoardStore,
        remote: Option<Arc<dyn DocumentStore>>,
        push: Option<PushHandle>,
        sink: Arc<dyn ReferenceSink>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store: Mutex::new(store),
                remote,
                push,
                sink,
                share_gate: tokio::sync::Mutex::new(()),
                config,
            }),
        }
    }

    fn store(&self) -> MutexGuard<'_, BoardStore> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remote(&self) -> SyncResult<Arc<dyn DocumentStore>> {
        self.inner.remote.clone().ok_or_else(|| {
            SyncError::RemoteUnavailable("no document store configured".to_string())
        })
    }

    /// Snapshot of the current board.
    pub fn board(&self) -> Board {
        self.store().board().clone()
    }

    /// Bound remote identity, `None` while unbound.
    pub fn identity(&self) -> Option<BoardId> {
        self.store().identity().cloned()
    }

    pub fn role(&self) -> Role {
        self.inner.config.role
    }

    pub fn is_local_only(&self) -> bool {
        self.inner.remote.is_none()
    }

    /// Registers an additional observer, e.g. a UI refresh hook.
    pub fn subscribe(&self, observer: Box<dyn BoardObserver>) {
        self.store().subscribe(observer);
    }

    pub fn set_cell_word(&self, index: usize, text: impl Into<String>) -> Result<(), BoardError> {
        self.store().set_cell_word(index, text)
    }

    pub fn cycle_cell_color(&self, index: usize) -> Result<CellColor, BoardError> {
        self.store().cycle_cell_color(index)
    }

    pub fn set_cell_color(&self, index: usize, color: CellColor) -> Result<(), BoardError> {
        self.store().set_cell_color(index, color)
    }

    pub fn set_notes(&self, text: impl Into<String>) {
        self.store().set_notes(text);
    }

    /// Clears the board and its identity, cancelling pending pushes.
    pub fn reset_board(&self) {
        let mut store = self.store();
        let previous = store.identity().cloned();
        store.reset();
        info!(
            "event=board_reset module=sync previous_board_id={}",
            previous.as_ref().map_or("none", |id| id.as_str())
        );
    }

    /// Replaces the local board with the remote document at `id` and binds it.
    ///
    /// # Errors
    /// - `NotFound` when no document exists; board and identity untouched.
    /// - `AlreadyBound` when the session is bound to a different id.
    /// - `RemoteUnavailable`/`InvalidDocument` on store or decode failure.
    /// - `Superseded` when the board was reset, bound or edited meanwhile.
    pub async fn load_board_from_id(&self, id: impl Into<BoardId>) -> SyncResult<()> {
        let id = id.into();
        let remote = self.remote()?;
        let (epoch, generation) = {
            let store = self.store();
            if let Some(current) = store.identity().filter(|current| **current != id) {
                warn!("event=board_load module=sync status=rejected board_id={id} bound_board_id={current}");
                return Err(SyncError::AlreadyBound {
                    current: current.clone(),
                    requested: id,
                });
            }
            (store.epoch(), store.generation())
        };
        let started_at = Instant::now();
        info!("event=board_load module=sync status=start board_id={id}");

        let document = match remote.get(BOARDS_COLLECTION, &id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!("event=board_load module=sync status=not_found board_id={id}");
                return Err(SyncError::NotFound(id));
            }
            Err(err) => {
                error!("event=board_load module=sync status=error board_id={id} error={err}");
                return Err(err.into());
            }
        };
        let board = document.to_board().map_err(|message| {
            error!("event=board_load module=sync status=invalid board_id={id} error={message}");
            SyncError::InvalidDocument(message)
        })?;

        // Any change since the ticket makes the fetched snapshot stale.
        let mut store = self.store();
        if store.epoch() != epoch || store.generation() != generation {
            info!(
                "event=board_load module=sync status=superseded board_id={id} identity_changed={}",
                store.epoch() != epoch
            );
            return Err(SyncError::Superseded);
        }
        store.apply_remote(
            board,
            Binding {
                id: id.clone(),
                created_at: document.created_at,
            },
        );
        info!(
            "event=board_load module=sync status=ok board_id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Shares the board, creating its remote document on first use.
    ///
    /// The reference is handed to the sink exactly once per successful call.
    ///
    /// # Errors
    /// - `RemoteUnavailable` when the document cannot be created; the board
    ///   stays unbound and the sink is not called.
    /// - `IdExhausted` when every generated id is taken.
    /// - `Superseded` when the board was reset or rebound during creation.
    pub async fn share_board(&self) -> SyncResult<ShareOutcome> {
        let _gate = self.inner.share_gate.lock().await;

        let existing = self.identity();
        let created = existing.is_none();
        let board_id = match existing {
            Some(id) => id,
            None => self.create_remote_board().await?,
        };

        let reference = share_reference(
            self.inner.config.share_base_url.as_deref(),
            &board_id,
            self.inner.config.role,
        );
        let sink_warning = match self.inner.sink.write(&reference).await {
            Ok(()) => None,
            Err(err) => {
                warn!("event=board_share module=sync status=sink_error board_id={board_id} error={err}");
                Some(err)
            }
        };
        info!("event=board_share module=sync status=ok board_id={board_id} created={created}");

        Ok(ShareOutcome {
            board_id,
            reference,
            created,
            sink_warning,
        })
    }

    async fn create_remote_board(&self) -> SyncResult<BoardId> {
        let remote = self.remote()?;
        let (board, ticket, generation) = {
            let store = self.store();
            (store.board().clone(), store.epoch(), store.generation())
        };
        let started_at = Instant::now();

        let id = self.allocate_id(remote.as_ref()).await?;
        let created_at = now_epoch_ms();
        let document = RemoteDocument::from_board(&board, created_at, created_at);
        if let Err(err) = remote.put(BOARDS_COLLECTION, &id, &document).await {
            error!("event=board_create module=sync status=error board_id={id} error={err}");
            return Err(err.into());
        }

        let mut store = self.store();
        if store.epoch() != ticket {
            info!("event=board_create module=sync status=superseded board_id={id}");
            return Err(SyncError::Superseded);
        }
        let edited_meanwhile = store.generation() != generation;
        let binding = Binding {
            id: id.clone(),
            created_at,
        };
        store.bind(binding.clone());
        if edited_meanwhile {
            if let Some(push) = &self.inner.push {
                push.schedule(store.generation(), &binding, store.board());
            }
        }
        info!(
            "event=board_create module=sync status=ok board_id={id} duration_ms={} catch_up_push={edited_meanwhile}",
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    async fn allocate_id(&self, remote: &dyn DocumentStore) -> SyncResult<BoardId> {
        let attempts = self.inner.config.share_id_attempts.max(1);
        for attempt in 1..=attempts {
            let candidate = BoardId::generate();
            if remote.get(BOARDS_COLLECTION, &candidate).await?.is_none() {
                return Ok(candidate);
            }
            warn!("event=board_id_collision module=sync attempt={attempt} board_id={candidate}");
        }
        Err(SyncError::IdExhausted { attempts })
    }

    /// Waits for the push worker to catch up with the newest local change.
    ///
    /// # Errors
    /// - `RemoteUnavailable` when the newest write failed or the worker stopped.
    pub async fn flush(&self) -> SyncResult<PushStatus> {
        let Some(push) = &self.inner.push else {
            return Ok(PushStatus::default());
        };
        let status = push.settle().await.ok_or_else(|| {
            SyncError::RemoteUnavailable("push worker stopped".to_string())
        })?;
        match &status.last_error {
            Some(message) => Err(SyncError::RemoteUnavailable(message.clone())),
            None => Ok(status),
        }
    }

    /// Current push worker progress without waiting.
    pub fn push_status(&self) -> PushStatus {
        self.inner
            .push
            .as_ref()
            .map(PushHandle::status)
            .unwrap_or_default()
    }
}
