//! Remote document store contracts and implementations.
//!
//! # Responsibility
//! - Define the async `get`/`put` contract the sync engine relies on.
//! - Provide an in-memory store and a SQLite-backed store.
//!
//! # Invariants
//! - `put` is a full replacement of the document at `(collection, id)`.
//! - `get` returns `Ok(None)` for a missing document; transport problems are
//!   errors, never `None`.

pub mod document_store;
pub mod memory_store;
pub mod sqlite_store;

pub use document_store::{DocumentStore, StoreError, StoreResult};
pub use memory_store::MemoryDocumentStore;
pub use sqlite_store::SqliteDocumentStore;
