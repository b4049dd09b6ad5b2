//! Participant roles and share references.

use crate::model::board::BoardId;
use std::fmt::{Display, Formatter};

/// Which side of the table the local participant plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    /// Sees the key card and writes clues/notes.
    #[default]
    Giver,
    Guesser,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Giver => "giver",
            Self::Guesser => "guesser",
        }
    }

    /// Parses `giver`/`guesser`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "giver" => Some(Self::Giver),
            "guesser" => Some(Self::Guesser),
            _ => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the text handed to the reference sink.
///
/// With a base URL this is `{base}?board={id}&role={role}`; without one the
/// bare id is shared.
pub fn share_reference(base_url: Option<&str>, id: &BoardId, role: Role) -> String {
    match base_url {
        Some(base) => format!("{base}?board={id}&role={role}"),
        None => id.to_string(),
    }
}
