//! In-session board state container.
//!
//! # Responsibility
//! - Own the canonical `Board` and its optional remote binding.
//! - Expose the controlled mutation entry points used by UI collaborators.
//! - Notify observers synchronously after every change.
//!
//! # Invariants
//! - Mutations are synchronous and applied in call order.
//! - `generation` increases by one on every change, whatever its origin.
//! - `epoch` increases only on identity transitions (bind, remote apply, reset).
//! - Observers learn the origin of a change; remote application is never
//!   reported as a local edit.

use crate::model::board::{Board, BoardError, BoardId, CellColor};
use log::debug;

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// A UI mutation (`set_cell_word`, `cycle_cell_color`, ...).
    Local,
    /// A remote snapshot replaced local content and bound its identity.
    Remote,
    /// The current content was bound to a freshly created remote document.
    Bind,
    /// The board was reinitialized and unbound.
    Reset,
}

/// Change notification delivered to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardChange {
    pub origin: ChangeOrigin,
    pub generation: u64,
    pub epoch: u64,
}

/// Remote identity bound to the local board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub id: BoardId,
    /// Creation time of the remote document, carried into every overwrite.
    pub created_at: i64,
}

/// Receives every change applied to a `BoardStore`.
pub trait BoardObserver: Send {
    fn on_change(&self, change: &BoardChange, store: &BoardStore);
}

/// Canonical board container for one client session.
#[derive(Default)]
pub struct BoardStore {
    board: Board,
    binding: Option<Binding>,
    generation: u64,
    epoch: u64,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Bound remote identity, or `None` while the board is purely local.
    pub fn identity(&self) -> Option<&BoardId> {
        self.binding.as_ref().map(|binding| &binding.id)
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Registers an observer for all subsequent changes.
    pub fn subscribe(&mut self, observer: Box<dyn BoardObserver>) {
        self.observers.push(observer);
    }

    /// Replaces the word of one cell, keeping its color.
    pub fn set_cell_word(&mut self, index: usize, text: impl Into<String>) -> Result<(), BoardError> {
        self.board.cell_mut(index)?.word = text.into();
        self.commit(ChangeOrigin::Local);
        Ok(())
    }

    /// Advances one cell to the next color in the fixed cycle.
    ///
    /// Returns the new color.
    pub fn cycle_cell_color(&mut self, index: usize) -> Result<CellColor, BoardError> {
        let cell = self.board.cell_mut(index)?;
        cell.color = cell.color.next();
        let color = cell.color;
        self.commit(ChangeOrigin::Local);
        Ok(color)
    }

    /// Assigns a color chosen from the editing overlay.
    ///
    /// # Errors
    /// - `ColorNotAssignable` for `CellColor::Unassigned`; only reset clears a
    ///   cell back to unassigned.
    pub fn set_cell_color(&mut self, index: usize, color: CellColor) -> Result<(), BoardError> {
        if !color.is_assignable() {
            return Err(BoardError::ColorNotAssignable(color));
        }
        self.board.cell_mut(index)?.color = color;
        self.commit(ChangeOrigin::Local);
        Ok(())
    }

    pub fn set_notes(&mut self, text: impl Into<String>) {
        self.board.notes = text.into();
        self.commit(ChangeOrigin::Local);
    }

    /// Reinitializes every cell and the notes, and clears the binding.
    pub fn reset(&mut self) {
        self.board = Board::default();
        self.binding = None;
        self.epoch += 1;
        self.commit(ChangeOrigin::Reset);
    }

    /// Replaces all content with a remote snapshot, then binds its identity.
    pub(crate) fn apply_remote(&mut self, board: Board, binding: Binding) {
        self.board = board;
        self.binding = Some(binding);
        self.epoch += 1;
        self.commit(ChangeOrigin::Remote);
    }

    /// Binds the current content to a newly created remote document.
    pub(crate) fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
        self.epoch += 1;
        self.commit(ChangeOrigin::Bind);
    }

    fn commit(&mut self, origin: ChangeOrigin) {
        self.generation += 1;
        let change = BoardChange {
            origin,
            generation: self.generation,
            epoch: self.epoch,
        };
        debug!(
            "event=board_change module=store origin={:?} generation={} epoch={} bound={}",
            origin,
            change.generation,
            change.epoch,
            self.binding.is_some()
        );
        for observer in &self.observers {
            observer.on_change(&change, self);
        }
    }
}
