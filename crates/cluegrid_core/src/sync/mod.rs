//! Synchronization engine between the local board and the document store.
//!
//! # Responsibility
//! - Pull remote documents into the board store (`load_board_from_id`).
//! - Push local edits to the bound remote document.
//! - Create and hand out share references (`share_board`).
//!
//! # Invariants
//! - Push is triggered by local edits only; pull and push are separate
//!   one-directional channels.
//! - Concurrent writers to one document resolve last-write-wins.

pub mod error;
pub mod push;
pub mod session;
pub mod share;
pub mod sink;
