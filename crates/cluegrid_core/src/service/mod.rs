//! Board state services.
//!
//! # Responsibility
//! - Hold the canonical in-session board and its controlled mutations.
//! - Keep UI collaborators decoupled from synchronization details.

pub mod board_store;
