//! Board domain model shared by the store and the sync engine.
//!
//! # Responsibility
//! - Define canonical board, cell and identity types.
//! - Define the persisted remote document shape.
//!
//! # Invariants
//! - A board always has exactly 25 cells.
//! - Board identity is an opaque token; only the store binds or clears it.

pub mod board;
pub mod document;
