use super::square::Square;
use std::fmt;
use std::ops::Not;
use strum_macros::{EnumCount, EnumIter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum PieceKind {
    Rook = 0,
    Knight = 1,
    Bishop = 2,
    Queen = 3,
    King = 4,
    Pawn = 5,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl Side {
    pub fn to_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    /// Row delta of a pawn step; White starts on row 6 and moves towards row 0.
    pub fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    pub fn back_row(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    pub fn pawn_row(self) -> u8 {
        match self {
            Side::White => 6,
            Side::Black => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl PieceKind {
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c {
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            'p' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Rook   => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen  => 'q',
            PieceKind::King   => 'k',
            PieceKind::Pawn   => 'p',
        }
    }

    pub fn to_emoji(&self) -> char {
        // We change the color via Ansi codes
        match self {
            PieceKind::Rook => '♜',
            PieceKind::Knight => '♞',
            PieceKind::Bishop => '♝',
            PieceKind::Queen => '♛',
            PieceKind::King => '♚',
            PieceKind::Pawn => '♟',
        }
    }
}

/// Stable identity of a piece for the whole game, printed as `wR1`, `bP8`, `wK`.
///
/// Kings and the first queen of a side carry index 0; every other piece is numbered from 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    pub side: Side,
    pub kind: PieceKind,
    pub index: u8,
}

impl PieceId {
    pub const fn new(side: Side, kind: PieceKind, index: u8) -> Self {
        Self { side, kind, index }
    }

    pub const fn king(side: Side) -> Self {
        Self::new(side, PieceKind::King, 0)
    }

    pub fn parse(string: &str) -> Option<PieceId> {
        let mut chars = string.chars();

        let side = match chars.next()? {
            'w' => Side::White,
            'b' => Side::Black,
            _ => return None,
        };
        let kind = PieceKind::from_char(chars.next()?.to_ascii_lowercase())?;
        let rest = chars.as_str();
        let index = if rest.is_empty() { 0 } else { rest.parse().ok()? };

        Some(PieceId::new(side, kind, index))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.side.to_char(),
            self.kind.to_char().to_ascii_uppercase()
        )?;

        if self.index != 0 {
            write!(f, "{}", self.index)?;
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub square: Square,
    pub has_moved: bool,
    pub can_be_passanted: bool, // pawn only: double-advanced and the opponent has not replied yet
    pub captured: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, square: Square) -> Self {
        Self {
            kind,
            side,
            square,
            has_moved: false,
            can_be_passanted: false,
            captured: false,
        }
    }

    /// Commit a relocation, updating the move bookkeeping.
    ///
    /// Probes never come through here; they relocate through the board without touching
    /// `has_moved` or `can_be_passanted`.
    pub fn set_square(&mut self, square: Square) {
        self.can_be_passanted =
            self.kind == PieceKind::Pawn && self.square.row.abs_diff(square.row) == 2;
        self.has_moved = true;
        self.square = square;
    }
}
