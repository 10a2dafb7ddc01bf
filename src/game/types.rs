//! Shared game vocabulary
//!
//! Sides, proposed moves coming from the board, and moves the rules engine
//! has accepted.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Role, Square};
use std::fmt;

/// A side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }

    /// Side owning a board piece code such as `"wP"` or `"bK"`.
    ///
    /// Returns `None` for anything that is not a colour prefix followed by
    /// one of `PNBRQK`.
    pub fn from_piece_code(code: &str) -> Option<Side> {
        let [colour, role] = code.as_bytes() else {
            return None;
        };
        if !b"PNBRQK".contains(role) {
            return None;
        }
        match *colour {
            b'w' => Some(Side::White),
            b'b' => Some(Side::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// A move dropped on the board, before the rules engine has seen it
///
/// Promotion is always to a queen; the board has no promotion picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Role,
}

impl ProposedMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Role::Queen,
        }
    }
}

impl fmt::Display for ProposedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A move the rules engine has played, in both notations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// UCI form, sent to the arbitration service
    pub uci: String,
    /// SAN form, for logs and the terminal board
    pub san: String,
}
