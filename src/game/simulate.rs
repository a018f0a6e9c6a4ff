use super::board::{Board, CastleSide};
use super::movegen::Candidate;
use super::pieces::{Piece, PieceId};
use super::square::Square;

/// A positional change made only to look at king safety, reverted by [`Board::undo_probe`].
///
/// Holds the origin of every relocated piece and the piece lifted off the board, if any.
#[derive(Debug)]
#[must_use]
pub(crate) struct Probe {
    origins: [Option<(PieceId, Square)>; 2],
    lifted: Option<(PieceId, Piece)>,
}

impl Board {
    /// Lift `victim` (if any), then relocate up to two pieces. No move bookkeeping changes.
    pub(crate) fn apply_probe(
        &mut self,
        moves: &[(PieceId, Square)],
        victim: Option<PieceId>,
    ) -> Probe {
        debug_assert!(moves.len() <= 2);

        let lifted = victim.and_then(|id| self.lift(id).map(|piece| (id, piece)));

        let mut origins = [None; 2];
        for (slot, &(id, to)) in origins.iter_mut().zip(moves) {
            *slot = self.relocate(id, to).map(|from| (id, from));
        }

        Probe { origins, lifted }
    }

    pub(crate) fn undo_probe(&mut self, probe: Probe) {
        for (id, from) in probe.origins.into_iter().rev().flatten() {
            self.relocate(id, from);
        }

        if let Some((id, piece)) = probe.lifted {
            self.restore(id, piece);
        }
    }

    /// Would moving `id` to `to` (removing `victim`) leave its own king attacked?
    pub(crate) fn simulate_move_for_check(
        &mut self,
        id: PieceId,
        to: Square,
        victim: Option<PieceId>,
    ) -> bool {
        let probe = self.apply_probe(&[(id, to)], victim);
        let in_check = self.check_king_under_attack(id.side);
        self.undo_probe(probe);

        log::trace!("probe {} to {}: in check = {}", id, to, in_check);

        in_check
    }

    /// Would the king stand attacked once king and rook have both landed?
    pub(crate) fn simulate_castle_for_check(
        &mut self,
        king: PieceId,
        rook: PieceId,
        side: CastleSide,
    ) -> bool {
        let (king_to, rook_to) = self.castle_targets(king, rook, side);

        let probe = self.apply_probe(&[(king, king_to), (rook, rook_to)], None);
        let in_check = self.check_king_under_attack(king.side);
        self.undo_probe(probe);

        log::trace!("castle probe {} {:?}: in check = {}", king, side, in_check);

        in_check
    }

    /// Castling needs the king safe where it starts and where it lands. With strict castling
    /// the square it crosses must be safe as well.
    fn is_castle_safe(&mut self, king: PieceId, rook: PieceId, side: CastleSide, to: Square) -> bool {
        if self.check_king_under_attack(king.side) {
            return false;
        }

        if self.options().strict_castling {
            let Some(from) = self.king_square(king.side) else {
                return false;
            };
            let transit = Square {
                row: from.row,
                col: (from.col + to.col) / 2,
            };

            if self.is_square_attacked(transit, !king.side) {
                return false;
            }
        }

        !self.simulate_castle_for_check(king, rook, side)
    }

    pub(crate) fn is_candidate_safe(&mut self, id: PieceId, candidate: &Candidate) -> bool {
        match *candidate {
            Candidate::Quiet(to) => !self.simulate_move_for_check(id, to, None),
            Candidate::Capture(to, victim) => !self.simulate_move_for_check(id, to, Some(victim)),
            Candidate::EnPassant { to, victim } => {
                !self.simulate_move_for_check(id, to, Some(victim))
            }
            Candidate::Castle { to, rook, side } => self.is_castle_safe(id, rook, side, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Placement, RuleOptions};
    use crate::game::pieces::{PieceKind, Side};

    fn snapshot(board: &Board) -> (Vec<(PieceId, Piece)>, Vec<Option<PieceId>>) {
        let mut pieces: Vec<_> = board.pieces.iter().map(|(id, piece)| (*id, *piece)).collect();
        pieces.sort_by_key(|(id, _)| *id);

        let squares = board.squares.iter().flatten().copied().collect();

        (pieces, squares)
    }

    #[test]
    fn capture_probe_restores_the_position() {
        let mut board = Board::from_placements(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::Queen, Side::White, Square::D1),
                Placement::new(PieceKind::Rook, Side::Black, Square::D7),
                Placement::new(PieceKind::King, Side::Black, Square::E8),
            ],
            Side::White,
            RuleOptions::default(),
        )
        .unwrap();

        let before = snapshot(&board);

        let queen = PieceId::new(Side::White, PieceKind::Queen, 0);
        let rook = PieceId::new(Side::Black, PieceKind::Rook, 1);

        let probe = board.apply_probe(&[(queen, Square::D7)], Some(rook));
        assert_eq!(board.occupant(Square::D7), Some(queen));
        assert_eq!(board.occupant(Square::D1), None);
        assert!(board.piece(rook).is_none());

        board.undo_probe(probe);
        assert_eq!(snapshot(&board), before);
        assert!(board.captured_pieces().is_empty());
    }

    #[test]
    fn castle_probe_restores_both_pieces() {
        let mut board = Board::from_placements(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::Rook, Side::White, Square::H1),
                Placement::new(PieceKind::Rook, Side::Black, Square::G8),
                Placement::new(PieceKind::King, Side::Black, Square::A8),
            ],
            Side::White,
            RuleOptions::default(),
        )
        .unwrap();
        let before = snapshot(&board);

        let king = PieceId::king(Side::White);
        let rook = PieceId::new(Side::White, PieceKind::Rook, 1);

        // g1 is covered by the rook on g8
        assert!(board.simulate_castle_for_check(king, rook, CastleSide::Short));
        assert_eq!(snapshot(&board), before);
    }

    #[test]
    fn probe_does_not_touch_move_bookkeeping() {
        let mut board = Board::new();
        let pawn = PieceId::new(Side::White, PieceKind::Pawn, 4);

        assert!(!board.simulate_move_for_check(pawn, Square::D4, None));

        let piece = board.piece(pawn).unwrap();
        assert_eq!(piece.square, Square::D2);
        assert!(!piece.has_moved);
        assert!(!piece.can_be_passanted);
    }

    #[test]
    fn moving_the_king_into_a_rook_file_is_check() {
        let mut board = Board::from_placements(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::Rook, Side::Black, Square::D8),
                Placement::new(PieceKind::King, Side::Black, Square::H8),
            ],
            Side::White,
            RuleOptions::default(),
        )
        .unwrap();

        let king = PieceId::king(Side::White);
        assert!(board.simulate_move_for_check(king, Square::D2, None));
        assert!(!board.simulate_move_for_check(king, Square::F2, None));
        assert_eq!(board.king_square(Side::White), Some(Square::E1));
    }
}
