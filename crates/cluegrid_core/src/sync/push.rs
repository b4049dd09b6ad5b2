//! Local-to-remote push path.
//!
//! # Responsibility
//! - Turn local board changes into full-document writes while bound.
//! - Serialize writes so the remote copy follows local mutation order.
//! - Drop pending writes when the board is reset.
//!
//! # Invariants
//! - Only `ChangeOrigin::Local` changes schedule a push; applying a remote
//!   snapshot never does, so a pull cannot echo back as a write.
//! - Requests travel through a latest-value channel consumed by one worker:
//!   a superseded snapshot that has not started yet is never written, and no
//!   write can overtake an earlier one.
//! - The worker never touches local state; a write finishing after a reset
//!   cannot rebind the session.

use crate::model::board::{Board, BoardId};
use crate::model::document::{now_epoch_ms, RemoteDocument, BOARDS_COLLECTION};
use crate::repo::document_store::DocumentStore;
use crate::service::board_store::{Binding, BoardChange, BoardObserver, BoardStore, ChangeOrigin};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

#[derive(Debug, Clone)]
struct PushJob {
    id: BoardId,
    board: Board,
    created_at: i64,
}

#[derive(Debug, Clone, Default)]
struct PushRequest {
    generation: u64,
    job: Option<PushJob>,
}

/// Progress of the push worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushStatus {
    /// Board generation of the newest request the worker finished.
    pub generation: u64,
    /// Documents written successfully.
    pub pushed: u64,
    /// Failure of the newest attempted write; cleared by the next success.
    pub last_error: Option<String>,
}

/// Shared handle to one session's push worker.
#[derive(Clone)]
pub(crate) struct PushHandle {
    requests: Arc<watch::Sender<PushRequest>>,
    status: watch::Receiver<PushStatus>,
}

impl PushHandle {
    /// Spawns the worker on the current tokio runtime.
    pub(crate) fn spawn(remote: Arc<dyn DocumentStore>) -> Self {
        let (requests, request_rx) = watch::channel(PushRequest::default());
        let (status_tx, status) = watch::channel(PushStatus::default());
        tokio::spawn(run_push_worker(remote, request_rx, status_tx));
        Self {
            requests: Arc::new(requests),
            status,
        }
    }

    /// Replaces any pending request with a write of `board` to `binding`.
    pub(crate) fn schedule(&self, generation: u64, binding: &Binding, board: &Board) {
        debug!(
            "event=push_schedule module=sync board_id={} generation={}",
            binding.id, generation
        );
        self.requests.send_replace(PushRequest {
            generation,
            job: Some(PushJob {
                id: binding.id.clone(),
                board: board.clone(),
                created_at: binding.created_at,
            }),
        });
    }

    /// Drops any pending request; an in-flight write still completes.
    pub(crate) fn cancel(&self, generation: u64) {
        let dropped = self.requests.send_replace(PushRequest {
            generation,
            job: None,
        });
        if let Some(job) = dropped.job {
            info!(
                "event=push_cancel module=sync board_id={} generation={}",
                job.id, dropped.generation
            );
        }
    }

    pub(crate) fn status(&self) -> PushStatus {
        self.status.borrow().clone()
    }

    /// Waits until the worker has finished the newest scheduled request.
    ///
    /// Returns `None` when the worker is gone.
    pub(crate) async fn settle(&self) -> Option<PushStatus> {
        let target = self.requests.borrow().generation;
        let mut status = self.status.clone();
        let settled = status
            .wait_for(|status| status.generation >= target)
            .await
            .ok()?
            .clone();
        Some(settled)
    }

    pub(crate) fn observer(&self) -> PushScheduler {
        PushScheduler {
            handle: self.clone(),
        }
    }
}

/// Board observer feeding local edits into the push worker.
pub(crate) struct PushScheduler {
    handle: PushHandle,
}

impl BoardObserver for PushScheduler {
    fn on_change(&self, change: &BoardChange, store: &BoardStore) {
        match change.origin {
            ChangeOrigin::Local => {
                if let Some(binding) = store.binding() {
                    self.handle
                        .schedule(change.generation, binding, store.board());
                }
            }
            ChangeOrigin::Reset => self.handle.cancel(change.generation),
            ChangeOrigin::Remote | ChangeOrigin::Bind => {}
        }
    }
}

async fn run_push_worker(
    remote: Arc<dyn DocumentStore>,
    mut requests: watch::Receiver<PushRequest>,
    status: watch::Sender<PushStatus>,
) {
    while requests.changed().await.is_ok() {
        let request = requests.borrow_and_update().clone();
        let outcome = match &request.job {
            Some(job) => Some(write_job(remote.as_ref(), job, request.generation).await),
            None => None,
        };
        status.send_modify(|status| {
            status.generation = request.generation;
            match outcome {
                Some(Ok(())) => {
                    status.pushed += 1;
                    status.last_error = None;
                }
                Some(Err(message)) => status.last_error = Some(message),
                None => {}
            }
        });
    }
    debug!("event=push_worker_stop module=sync");
}

async fn write_job(remote: &dyn DocumentStore, job: &PushJob, generation: u64) -> Result<(), String> {
    let started_at = Instant::now();
    let document = RemoteDocument::from_board(&job.board, job.created_at, now_epoch_ms());
    match remote.put(BOARDS_COLLECTION, &job.id, &document).await {
        Ok(()) => {
            info!(
                "event=board_push module=sync status=ok board_id={} generation={} duration_ms={}",
                job.id,
                generation,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            warn!(
                "event=board_push module=sync status=error board_id={} generation={} duration_ms={} error={}",
                job.id,
                generation,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.to_string())
        }
    }
}
