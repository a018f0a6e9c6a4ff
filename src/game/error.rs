//! Errors raised by the rules engine at its API boundary.

use super::pieces::{PieceId, Side};
use super::square::Square;
use thiserror::Error;

/// Why a submitted move was refused. The board is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// No active piece with this id (never existed or already captured)
    #[error("no active piece {0}")]
    UnknownPiece(PieceId),

    /// The piece belongs to the side that is not on move
    #[error("{piece} cannot move, {to_move} is to move")]
    WrongSide { piece: PieceId, to_move: Side },

    /// Destination is not among the piece's current legal moves
    #[error("illegal move: {piece} from {from} to {to}")]
    IllegalMove {
        piece: PieceId,
        from: Square,
        to: Square,
    },
}

/// Problems with a hand-built position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("square {0:?} is off the board")]
    OffBoard(Square),

    #[error("{square} is already occupied by {existing}")]
    Occupied { square: Square, existing: PieceId },

    #[error("{0} has no king")]
    MissingKing(Side),

    #[error("{0} has more than one king")]
    ExtraKing(Side),
}
