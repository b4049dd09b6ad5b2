//! Board domain model.
//!
//! # Responsibility
//! - Define the 25-cell grid, its color classification and the notes field.
//! - Provide the pure color-cycle rule used by tap-to-cycle editing.
//!
//! # Invariants
//! - A board always holds exactly `BOARD_CELL_COUNT` cells in fixed order.
//! - `CellColor` is a closed set; there is no free-form color value.
//! - `BoardId` is opaque: core never parses or validates its format.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Number of cells on every board (5 x 5 grid).
pub const BOARD_CELL_COUNT: usize = 25;

const GENERATED_ID_LEN: usize = 12;
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Color classification of one cell.
///
/// Serialized with the wire names persisted remote documents already use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColor {
    /// Not yet assigned. Reachable by reset or by cycling past `Elimination`.
    #[default]
    #[serde(rename = "white")]
    Unassigned,
    #[serde(rename = "red")]
    TeamA,
    #[serde(rename = "blue")]
    TeamB,
    #[serde(rename = "beige")]
    Bystander,
    #[serde(rename = "black")]
    Elimination,
}

impl CellColor {
    /// Fixed cycle order used by `next`.
    pub const CYCLE: [CellColor; 5] = [
        CellColor::Unassigned,
        CellColor::TeamA,
        CellColor::TeamB,
        CellColor::Bystander,
        CellColor::Elimination,
    ];

    /// Returns the color following `self` in `CYCLE`, wrapping after the last.
    pub fn next(self) -> Self {
        match self {
            Self::Unassigned => Self::TeamA,
            Self::TeamA => Self::TeamB,
            Self::TeamB => Self::Bystander,
            Self::Bystander => Self::Elimination,
            Self::Elimination => Self::Unassigned,
        }
    }

    /// Whether a user may pick this color directly from the editing overlay.
    pub fn is_assignable(self) -> bool {
        !matches!(self, Self::Unassigned)
    }

    /// Stable wire name (`white|red|blue|beige|black`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "white",
            Self::TeamA => "red",
            Self::TeamB => "blue",
            Self::Bystander => "beige",
            Self::Elimination => "black",
        }
    }
}

/// One grid position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub word: String,
    pub color: CellColor,
}

impl Cell {
    pub fn new(word: impl Into<String>, color: CellColor) -> Self {
        Self {
            word: word.into(),
            color,
        }
    }
}

/// Validation errors for board mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    CellIndexOutOfRange { index: usize },
    ColorNotAssignable(CellColor),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CellIndexOutOfRange { index } => write!(
                f,
                "cell index {index} is out of range (expected 0..{BOARD_CELL_COUNT})"
            ),
            Self::ColorNotAssignable(color) => {
                write!(f, "color `{}` cannot be assigned directly", color.as_str())
            }
        }
    }
}

impl Error for BoardError {}

/// The 25-cell grid plus free-text notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_CELL_COUNT],
    pub notes: String,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: std::array::from_fn(|_| Cell::default()),
            notes: String::new(),
        }
    }
}

impl Board {
    /// Builds a board from exactly `BOARD_CELL_COUNT` cells.
    ///
    /// Returns the cell count as error when the input has the wrong length.
    pub fn from_cells(cells: Vec<Cell>, notes: impl Into<String>) -> Result<Self, usize> {
        let count = cells.len();
        let cells: [Cell; BOARD_CELL_COUNT] = cells.try_into().map_err(|_| count)?;
        Ok(Self {
            cells,
            notes: notes.into(),
        })
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELL_COUNT] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Result<&Cell, BoardError> {
        self.cells
            .get(index)
            .ok_or(BoardError::CellIndexOutOfRange { index })
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, BoardError> {
        self.cells
            .get_mut(index)
            .ok_or(BoardError::CellIndexOutOfRange { index })
    }

    /// Returns whether every cell is blank/unassigned and notes are empty.
    pub fn is_blank(&self) -> bool {
        self.notes.is_empty()
            && self
                .cells
                .iter()
                .all(|cell| cell.word.is_empty() && cell.color == CellColor::Unassigned)
    }
}

/// Opaque identity linking a local board to its remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(String);

impl BoardId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a short lowercase base-36 token from a random UUID.
    ///
    /// Uniqueness is best-effort; callers that need it check the store.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().as_u128();
        let mut token = String::with_capacity(GENERATED_ID_LEN);
        for _ in 0..GENERATED_ID_LEN {
            token.push(char::from(BASE36_ALPHABET[(value % 36) as usize]));
            value /= 36;
        }
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BoardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
