//! Async document store contract.

use crate::db::DbError;
use crate::model::board::BoardId;
use crate::model::document::RemoteDocument;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure talking to a document store.
#[derive(Debug)]
pub enum StoreError {
    /// The store cannot be reached or was never initialized.
    Unavailable(String),
    Db(DbError),
    /// A persisted document could not be decoded.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "document store unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed document storage shared by every client of a board.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads one document. `Ok(None)` when no document exists at `id`.
    async fn get(&self, collection: &str, id: &BoardId) -> StoreResult<Option<RemoteDocument>>;

    /// Creates or fully replaces the document at `id`.
    async fn put(&self, collection: &str, id: &BoardId, document: &RemoteDocument)
        -> StoreResult<()>;
}
