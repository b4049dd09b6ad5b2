//! Remote document shape for persisted boards.
//!
//! # Responsibility
//! - Define the JSON shape written to and read from the `boards` collection.
//! - Convert between `Board` snapshots and persisted documents.
//!
//! # Invariants
//! - Writes are full replacements; a document always carries all 25 cells.
//! - A decoded document with a cell count other than 25 is rejected, never
//!   truncated or padded.

use crate::model::board::{Board, Cell, BOARD_CELL_COUNT};
use serde::{Deserialize, Serialize};

/// The single logical collection boards are stored in.
pub const BOARDS_COLLECTION: &str = "boards";

/// Persisted counterpart of a `Board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    /// Older documents name this field `cards`.
    #[serde(default = "blank_cells", alias = "cards")]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub notes: String,
    /// Unix epoch milliseconds of the first share.
    #[serde(default)]
    pub created_at: i64,
    /// Unix epoch milliseconds of the latest write.
    #[serde(default)]
    pub updated_at: i64,
}

fn blank_cells() -> Vec<Cell> {
    vec![Cell::default(); BOARD_CELL_COUNT]
}

impl RemoteDocument {
    /// Snapshots `board` into a document with the given timestamps.
    pub fn from_board(board: &Board, created_at: i64, updated_at: i64) -> Self {
        Self {
            cells: board.cells().to_vec(),
            notes: board.notes.clone(),
            created_at,
            updated_at,
        }
    }

    /// Rebuilds a `Board` from this document.
    ///
    /// # Errors
    /// - Returns a message naming the cell count when it is not 25.
    pub fn to_board(&self) -> Result<Board, String> {
        Board::from_cells(self.cells.clone(), self.notes.clone()).map_err(|count| {
            format!("document holds {count} cells, expected {BOARD_CELL_COUNT}")
        })
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
