//! Core board synchronization for the clue-grid party game companion.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardError, BoardId, Cell, CellColor, BOARD_CELL_COUNT};
pub use model::document::{RemoteDocument, BOARDS_COLLECTION};
pub use repo::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore, StoreError, StoreResult};
pub use service::board_store::{
    Binding, BoardChange, BoardObserver, BoardStore, ChangeOrigin,
};
pub use sync::error::{SyncError, SyncResult};
pub use sync::push::PushStatus;
pub use sync::session::{BoardSession, ShareOutcome};
pub use sync::share::{share_reference, Role};
pub use sync::sink::{MemorySink, ReferenceSink, SinkError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
