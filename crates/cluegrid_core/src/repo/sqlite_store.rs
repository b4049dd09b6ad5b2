//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist board documents in the `documents` table as JSON bodies.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `put` upserts the whole document; no field-level merge.
//! - Read paths reject undecodable bodies instead of masking them.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::board::BoardId;
use crate::model::document::RemoteDocument;
use crate::repo::document_store::{DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

const DOCUMENT_SELECT_SQL: &str = "SELECT body, created_at, updated_at
FROM documents
WHERE collection = ?1 AND id = ?2;";

const DOCUMENT_UPSERT_SQL: &str = "INSERT INTO documents (collection, id, body, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (collection, id) DO UPDATE SET
    body = excluded.body,
    created_at = excluded.created_at,
    updated_at = excluded.updated_at;";

/// Document store over one SQLite connection.
///
/// Statements run on tokio's blocking pool so a busy database never stalls
/// the push worker or other tasks.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        open_db(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        open_db_in_memory().map(Self::new)
    }

    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| {
                StoreError::Unavailable("sqlite connection lock poisoned".to_string())
            })?;
            op(&*conn)
        })
        .await
        .map_err(|err| StoreError::Unavailable(format!("sqlite task failed: {err}")))?
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &BoardId) -> StoreResult<Option<RemoteDocument>> {
        let collection = collection.to_string();
        let id = id.clone();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(DOCUMENT_SELECT_SQL, params![collection, id.as_str()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                })
                .optional()?;

            let Some((body, created_at, updated_at)) = row else {
                return Ok(None);
            };

            let mut document: RemoteDocument = serde_json::from_str(&body).map_err(|err| {
                StoreError::InvalidData(format!("documents.body for `{collection}/{id}`: {err}"))
            })?;
            document.created_at = created_at;
            document.updated_at = updated_at;
            Ok(Some(document))
        })
        .await
    }

    async fn put(
        &self,
        collection: &str,
        id: &BoardId,
        document: &RemoteDocument,
    ) -> StoreResult<()> {
        let body = serde_json::to_string(document)
            .map_err(|err| StoreError::InvalidData(format!("cannot encode document: {err}")))?;
        let collection = collection.to_string();
        let id = id.clone();
        let (created_at, updated_at) = (document.created_at, document.updated_at);
        self.with_conn(move |conn| {
            conn.execute(
                DOCUMENT_UPSERT_SQL,
                params![collection, id.as_str(), body, created_at, updated_at],
            )?;
            Ok(())
        })
        .await
    }
}
