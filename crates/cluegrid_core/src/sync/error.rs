//! Sync engine error taxonomy.

use crate::model::board::{BoardError, BoardId};
use crate::repo::document_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of a pull, share or push operation.
///
/// None of these leave the local board corrupted; the session stays
/// editable after every variant.
#[derive(Debug)]
pub enum SyncError {
    /// No remote document exists for the requested id.
    NotFound(BoardId),
    /// The document store is missing or could not be reached.
    RemoteUnavailable(String),
    /// The remote document exists but cannot be applied to a board.
    InvalidDocument(String),
    /// A reset, bind or local edit happened while the operation was
    /// suspended; its result was discarded.
    Superseded,
    /// Every generated share id collided with an existing document.
    IdExhausted { attempts: u8 },
    /// The session is bound to another board; reset before loading a new one.
    AlreadyBound { current: BoardId, requested: BoardId },
    Board(BoardError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "board not found: {id}"),
            Self::RemoteUnavailable(message) => write!(f, "remote store unavailable: {message}"),
            Self::InvalidDocument(message) => write!(f, "invalid board document: {message}"),
            Self::Superseded => write!(f, "operation superseded by a newer board state"),
            Self::IdExhausted { attempts } => {
                write!(f, "no free board id found after {attempts} attempts")
            }
            Self::AlreadyBound { current, requested } => write!(
                f,
                "session is bound to board {current}; reset before loading {requested}"
            ),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for SyncError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InvalidData(message) => Self::InvalidDocument(message),
            other => Self::RemoteUnavailable(other.to_string()),
        }
    }
}
