use super::board::{Board, CastleSide};
use super::geometry::{Direction, GEOMETRY, MAX_RAY_LENGTH, Ray};
use super::pieces::{Piece, PieceId, PieceKind, Side};
use super::square::Square;

/// A pseudo-legal move: admissible by geometry and occupancy, not yet checked for king safety.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Candidate {
    Quiet(Square),
    Capture(Square, PieceId),
    EnPassant { to: Square, victim: PieceId },
    Castle { to: Square, rook: PieceId, side: CastleSide },
}

impl Candidate {
    pub fn destination(&self) -> Square {
        match *self {
            Candidate::Quiet(to) => to,
            Candidate::Capture(to, _) => to,
            Candidate::EnPassant { to, .. } => to,
            Candidate::Castle { to, .. } => to,
        }
    }
}

fn pawn_capture_directions(side: Side) -> [Direction; 2] {
    match side {
        Side::White => [Direction::UpLeft, Direction::UpRight],
        Side::Black => [Direction::DownLeft, Direction::DownRight],
    }
}

fn pawn_push_direction(side: Side) -> Direction {
    match side {
        Side::White => Direction::Up,
        Side::Black => Direction::Down,
    }
}

impl Piece {
    /// Walk each ray outward: empty squares continue the walk, an enemy ends it and is
    /// included, a friendly piece ends it and is not.
    fn slide(&self, board: &Board, rays: &[Ray], limit: usize, out: &mut Vec<Candidate>) {
        for ray in rays {
            for &square in ray.as_slice().iter().take(limit) {
                match board.occupant(square) {
                    None => out.push(Candidate::Quiet(square)),
                    Some(other) => {
                        if other.side != self.side {
                            out.push(Candidate::Capture(square, other));
                        }
                        break;
                    }
                }
            }
        }
    }

    fn jump(&self, board: &Board, targets: &[Square], out: &mut Vec<Candidate>) {
        for &square in targets {
            match board.occupant(square) {
                None => out.push(Candidate::Quiet(square)),
                Some(other) if other.side != self.side => {
                    out.push(Candidate::Capture(square, other))
                }
                Some(_) => {}
            }
        }
    }

    fn pawn_attacks(&self) -> impl Iterator<Item = Square> {
        let square = self.square;

        pawn_capture_directions(self.side)
            .into_iter()
            .filter_map(move |direction| GEOMETRY.ray(square, direction).first().copied())
    }

    fn pawn_moves(&self, board: &Board, out: &mut Vec<Candidate>) {
        let steps = if self.has_moved { 1 } else { 2 };

        for &square in GEOMETRY
            .ray(self.square, pawn_push_direction(self.side))
            .iter()
            .take(steps)
        {
            if board.occupant(square).is_some() {
                break;
            }
            out.push(Candidate::Quiet(square));
        }

        for square in self.pawn_attacks() {
            if let Some(victim) = board.occupant(square) {
                if victim.side != self.side {
                    out.push(Candidate::Capture(square, victim));
                }
            }
        }

        for direction in [Direction::Left, Direction::Right] {
            let Some(&beside) = GEOMETRY.ray(self.square, direction).first() else {
                continue;
            };
            let Some(victim) = board.occupant(beside) else {
                continue;
            };

            let passantable = victim.kind == PieceKind::Pawn
                && victim.side != self.side
                && board.piece(victim).is_some_and(|pawn| pawn.can_be_passanted);

            if !passantable {
                continue;
            }

            if let Some(to) = beside.offset(self.side.forward(), 0) {
                if board.occupant(to).is_none() {
                    out.push(Candidate::EnPassant { to, victim });
                }
            }
        }
    }

    /// The first piece along the rank must be our own unmoved rook, four files away on the
    /// long side and three on the short side.
    fn castling_moves(&self, board: &Board, out: &mut Vec<Candidate>) {
        if self.has_moved {
            return;
        }

        for (direction, distance, side) in [
            (Direction::Left, 4, CastleSide::Long),
            (Direction::Right, 3, CastleSide::Short),
        ] {
            let ray = GEOMETRY.ray(self.square, direction);

            for (step, &square) in ray.iter().enumerate() {
                let Some(other) = board.occupant(square) else {
                    continue;
                };

                let unmoved_rook = other.kind == PieceKind::Rook
                    && other.side == self.side
                    && board.piece(other).is_some_and(|rook| !rook.has_moved);

                if unmoved_rook && step + 1 == distance {
                    out.push(Candidate::Castle {
                        to: ray[1],
                        rook: other,
                        side,
                    });
                }
                break;
            }
        }
    }

    pub(crate) fn pseudo_legal_moves(&self, board: &Board) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(16);

        match self.kind {
            PieceKind::Rook => {
                self.slide(board, GEOMETRY.straights(self.square), MAX_RAY_LENGTH, &mut candidates)
            }
            PieceKind::Bishop => {
                self.slide(board, GEOMETRY.diagonals(self.square), MAX_RAY_LENGTH, &mut candidates)
            }
            PieceKind::Queen => {
                self.slide(board, GEOMETRY.straights(self.square), MAX_RAY_LENGTH, &mut candidates);
                self.slide(board, GEOMETRY.diagonals(self.square), MAX_RAY_LENGTH, &mut candidates);
            }
            PieceKind::Knight => self.jump(board, GEOMETRY.knight_jumps(self.square), &mut candidates),
            PieceKind::King => {
                self.slide(board, GEOMETRY.straights(self.square), 1, &mut candidates);
                self.slide(board, GEOMETRY.diagonals(self.square), 1, &mut candidates);
                self.castling_moves(board, &mut candidates);
            }
            PieceKind::Pawn => self.pawn_moves(board, &mut candidates),
        }

        candidates
    }

    /// Squares this piece threatens, used only to judge the opposing king's safety.
    ///
    /// Pawns threaten both forward diagonals whatever stands there; kings never threaten
    /// by castling.
    pub fn attack_moves(&self, board: &Board) -> Vec<Square> {
        match self.kind {
            PieceKind::Pawn => self.pawn_attacks().collect(),
            PieceKind::King => {
                let mut candidates = Vec::with_capacity(8);
                self.slide(board, GEOMETRY.straights(self.square), 1, &mut candidates);
                self.slide(board, GEOMETRY.diagonals(self.square), 1, &mut candidates);
                candidates.iter().map(Candidate::destination).collect()
            }
            _ => self
                .pseudo_legal_moves(board)
                .iter()
                .map(Candidate::destination)
                .collect(),
        }
    }
}

impl Board {
    /// Pseudo-legal candidates of one piece that survive the check simulation.
    pub(crate) fn legal_candidates(&mut self, id: PieceId) -> Vec<Candidate> {
        let Some(piece) = self.piece(id).copied() else {
            return vec![];
        };

        piece
            .pseudo_legal_moves(self)
            .into_iter()
            .filter(|candidate| self.is_candidate_safe(id, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Placement, RuleOptions};

    fn board(placements: &[Placement], to_move: Side) -> Board {
        Board::from_placements(placements, to_move, RuleOptions::default()).unwrap()
    }

    fn sorted(mut squares: Vec<Square>) -> Vec<Square> {
        squares.sort();
        squares
    }

    #[test]
    fn rook_ray_stops_on_enemy_and_before_friend() {
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::H1),
                Placement::new(PieceKind::King, Side::Black, Square::H8),
                Placement::new(PieceKind::Rook, Side::White, Square::D4),
                Placement::new(PieceKind::Pawn, Side::Black, Square::D6),
                Placement::new(PieceKind::Knight, Side::White, Square::B4),
            ],
            Side::White,
        );

        let rook = PieceId::new(Side::White, PieceKind::Rook, 1);
        let moves = sorted(board.legal_moves(rook));

        assert!(moves.contains(&Square::D5));
        assert!(moves.contains(&Square::D6));
        assert!(!moves.contains(&Square::D7));

        assert!(moves.contains(&Square::C4));
        assert!(!moves.contains(&Square::B4));
        assert!(!moves.contains(&Square::A4));

        // 2 up, 3 down, 1 left, 4 right
        assert_eq!(moves.len(), 10);
    }

    #[test]
    fn sliding_rays_respect_every_direction() {
        // Queen boxed in: friends on one side of each line, enemies on the other
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::A1),
                Placement::new(PieceKind::King, Side::Black, Square::H8),
                Placement::new(PieceKind::Queen, Side::White, Square::D4),
                Placement::new(PieceKind::Pawn, Side::White, Square::D3),
                Placement::new(PieceKind::Knight, Side::Black, Square::D6),
                Placement::new(PieceKind::Bishop, Side::White, Square::B4),
                Placement::new(PieceKind::Rook, Side::Black, Square::F4),
                Placement::new(PieceKind::Pawn, Side::White, Square::C3),
                Placement::new(PieceKind::Bishop, Side::Black, Square::F6),
                Placement::new(PieceKind::Knight, Side::White, Square::C5),
                Placement::new(PieceKind::Knight, Side::Black, Square::F2),
            ],
            Side::White,
        );

        let queen = PieceId::new(Side::White, PieceKind::Queen, 0);
        let moves = sorted(board.legal_moves(queen));

        let expected = sorted(vec![
            Square::D5,
            Square::D6,
            Square::C4,
            Square::E4,
            Square::F4,
            Square::E5,
            Square::F6,
            Square::E3,
            Square::F2,
        ]);
        assert_eq!(moves, expected);
    }

    #[test]
    fn knights_jump_over_blockers() {
        let mut board = Board::new();
        let knight = PieceId::new(Side::White, PieceKind::Knight, 1);

        assert_eq!(sorted(board.legal_moves(knight)), sorted(vec![Square::A3, Square::C3]));
    }

    #[test]
    fn pawn_attacks_ignore_occupancy() {
        let board = Board::new();
        let pawn = board.piece(PieceId::new(Side::White, PieceKind::Pawn, 5)).unwrap();

        assert_eq!(sorted(pawn.attack_moves(&board)), sorted(vec![Square::D3, Square::F3]));

        let edge = board.piece(PieceId::new(Side::Black, PieceKind::Pawn, 1)).unwrap();
        assert_eq!(edge.attack_moves(&board), vec![Square::B6]);
    }

    #[test]
    fn pawn_push_is_blocked_by_any_piece() {
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::King, Side::Black, Square::E8),
                Placement::new(PieceKind::Pawn, Side::White, Square::C2),
                Placement::new(PieceKind::Knight, Side::Black, Square::C4),
                Placement::new(PieceKind::Pawn, Side::White, Square::G2),
                Placement::new(PieceKind::Bishop, Side::White, Square::G3),
            ],
            Side::White,
        );

        let blocked_far = PieceId::new(Side::White, PieceKind::Pawn, 1);
        let blocked_near = PieceId::new(Side::White, PieceKind::Pawn, 2);

        assert_eq!(board.legal_moves(blocked_far), vec![Square::C3]);
        assert!(board.legal_moves(blocked_near).is_empty());
    }

    #[test]
    fn pawn_on_last_rank_has_no_moves() {
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::King, Side::Black, Square::A6),
                Placement::new(PieceKind::Pawn, Side::White, Square::C8),
            ],
            Side::White,
        );

        let pawn = PieceId::new(Side::White, PieceKind::Pawn, 1);
        assert!(board.legal_moves(pawn).is_empty());
    }

    #[test]
    fn pinned_piece_keeps_only_moves_along_the_pin() {
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::Rook, Side::White, Square::E4),
                Placement::new(PieceKind::Rook, Side::Black, Square::E8),
                Placement::new(PieceKind::King, Side::Black, Square::A8),
            ],
            Side::White,
        );

        let rook = PieceId::new(Side::White, PieceKind::Rook, 1);
        let moves = sorted(board.legal_moves(rook));

        assert_eq!(
            moves,
            sorted(vec![
                Square::E2,
                Square::E3,
                Square::E5,
                Square::E6,
                Square::E7,
                Square::E8
            ])
        );
    }

    #[test]
    fn king_cannot_capture_a_defended_piece() {
        let mut board = board(
            &[
                Placement::new(PieceKind::King, Side::White, Square::E1),
                Placement::new(PieceKind::Pawn, Side::Black, Square::E2),
                Placement::new(PieceKind::Bishop, Side::Black, Square::G4),
                Placement::new(PieceKind::King, Side::Black, Square::A8),
            ],
            Side::White,
        );

        let moves = board.legal_moves(PieceId::king(Side::White));
        assert!(!moves.contains(&Square::E2));
        assert!(moves.contains(&Square::F2));
        // the pawn covers d1 and f1
        assert!(!moves.contains(&Square::F1));
        assert!(!moves.contains(&Square::D1));
    }
}
