use super::error::{MoveError, SetupError};
use super::movegen::Candidate;
use super::pieces::{Piece, PieceId, PieceKind, Side};
use super::square::Square;
use fxhash::{FxHashMap, FxHashSet};
use std::fmt;
use strum::{EnumCount, IntoEnumIterator};

pub type PieceBoard = [[Option<PieceId>; 8]; 8];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Long,  // towards the a-file
    Short, // towards the h-file
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveRecord {
    Plain {
        piece: PieceId,
        from: Square,
        to: Square,
        captured: Option<PieceId>,
    },
    Castle {
        king: PieceId,
        rook: PieceId,
        side: CastleSide,
    },
    EnPassant {
        pawn: PieceId,
        from: Square,
        to: Square,
        captured: PieceId,
    },
}

impl MoveRecord {
    pub fn piece(&self) -> PieceId {
        match self {
            MoveRecord::Plain { piece, .. } => *piece,
            MoveRecord::Castle { king, .. } => *king,
            MoveRecord::EnPassant { pawn, .. } => *pawn,
        }
    }

    pub fn captured(&self) -> Option<PieceId> {
        match self {
            MoveRecord::Plain { captured, .. } => *captured,
            MoveRecord::Castle { .. } => None,
            MoveRecord::EnPassant { captured, .. } => Some(*captured),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Side },
    Stalemate,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// Also refuse castling through an attacked transit square.
    pub strict_castling: bool,
}

/// One piece of a set-up position handed to [`Board::from_placements`].
#[derive(Copy, Clone, Debug)]
pub struct Placement {
    pub kind: PieceKind,
    pub side: Side,
    pub square: Square,
    pub has_moved: bool,
}

impl Placement {
    /// Pawns off their starting row count as moved; everything else starts unmoved.
    pub fn new(kind: PieceKind, side: Side, square: Square) -> Self {
        Self {
            kind,
            side,
            square,
            has_moved: kind == PieceKind::Pawn && square.row != side.pawn_row(),
        }
    }

    pub fn moved(mut self) -> Self {
        self.has_moved = true;
        self
    }
}

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: FxHashMap<PieceId, Piece>,
    pub(crate) captured: FxHashMap<PieceId, Piece>,
    pub(crate) squares: PieceBoard,
    move_log: Vec<MoveRecord>,
    turn: usize, // plies played; even means White to move

    version: u64, // bumped on every committed change
    legal_cache: FxHashMap<PieceId, (u64, Vec<Square>)>,

    options: RuleOptions,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    fn empty(options: RuleOptions) -> Self {
        Self {
            pieces: FxHashMap::default(),
            captured: FxHashMap::default(),
            squares: PieceBoard::default(),
            move_log: Vec::new(),
            turn: 0,
            version: 0,
            legal_cache: FxHashMap::default(),
            options,
        }
    }

    /// The standard initial position, White to move.
    pub fn new() -> Self {
        Self::with_options(RuleOptions::default())
    }

    pub fn with_options(options: RuleOptions) -> Self {
        let mut board = Self::empty(options);

        for side in Side::iter() {
            let mut counts = [0u8; PieceKind::COUNT];

            for (col, kind) in BACK_ROW.iter().enumerate() {
                let index = match kind {
                    PieceKind::King | PieceKind::Queen => 0,
                    _ => {
                        counts[*kind as usize] += 1;
                        counts[*kind as usize]
                    }
                };
                let square = Square { row: side.back_row(), col: col as u8 };
                board.insert(PieceId::new(side, *kind, index), Piece::new(*kind, side, square));
            }

            for col in 0..8 {
                let square = Square { row: side.pawn_row(), col };
                board.insert(
                    PieceId::new(side, PieceKind::Pawn, col + 1),
                    Piece::new(PieceKind::Pawn, side, square),
                );
            }
        }

        board
    }

    /// An arbitrary arrangement with `to_move` to play.
    ///
    /// Each side needs exactly one king and no two pieces may share a square.
    pub fn from_placements(
        placements: &[Placement],
        to_move: Side,
        options: RuleOptions,
    ) -> Result<Self, SetupError> {
        let mut board = Self::empty(options);
        board.turn = to_move as usize;

        let mut counts: FxHashMap<(Side, PieceKind), u8> = FxHashMap::default();

        for placement in placements {
            if Square::new(placement.square.row, placement.square.col).is_none() {
                return Err(SetupError::OffBoard(placement.square));
            }

            if let Some(existing) = board.occupant(placement.square) {
                return Err(SetupError::Occupied {
                    square: placement.square,
                    existing,
                });
            }

            let count = counts.entry((placement.side, placement.kind)).or_insert(0);
            let index = match placement.kind {
                PieceKind::King if *count > 0 => return Err(SetupError::ExtraKing(placement.side)),
                PieceKind::King => 0,
                PieceKind::Queen => *count,
                _ => *count + 1,
            };
            *count += 1;

            let mut piece = Piece::new(placement.kind, placement.side, placement.square);
            piece.has_moved = placement.has_moved;
            board.insert(PieceId::new(placement.side, placement.kind, index), piece);
        }

        for side in Side::iter() {
            if !board.pieces.contains_key(&PieceId::king(side)) {
                return Err(SetupError::MissingKing(side));
            }
        }

        Ok(board)
    }

    fn insert(&mut self, id: PieceId, piece: Piece) {
        self.squares[piece.square.row as usize][piece.square.col as usize] = Some(id);
        self.pieces.insert(id, piece);
    }

    pub fn options(&self) -> RuleOptions {
        self.options
    }

    /// Changing the rules invalidates every cached move list.
    pub fn set_options(&mut self, options: RuleOptions) {
        if self.options != options {
            self.options = options;
            self.version += 1;
        }
    }

    pub fn side_to_move(&self) -> Side {
        if self.turn % 2 == 0 { Side::White } else { Side::Black }
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn captured_pieces(&self) -> &FxHashMap<PieceId, Piece> {
        &self.captured
    }

    /// Active pieces of one side, ordered by id.
    pub fn pieces_of(&self, side: Side) -> Vec<PieceId> {
        let mut ids: Vec<_> = self.pieces.keys().filter(|id| id.side == side).copied().collect();
        ids.sort();
        ids
    }

    pub fn occupant(&self, square: Square) -> Option<PieceId> {
        self.squares[square.row as usize][square.col as usize]
    }

    /// The piece on `square`, optionally restricted to one side (`None` matches either).
    pub fn check_for_piece_on_square(
        &self,
        square: Square,
        side: Option<Side>,
    ) -> Option<(PieceId, &Piece)> {
        let id = self.occupant(square)?;

        match side {
            Some(side) if id.side != side => None,
            _ => self.pieces.get(&id).map(|piece| (id, piece)),
        }
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces.get(&PieceId::king(side)).map(|king| king.square)
    }

    /// Every square attacked by `side`, recomputed from the current position.
    pub fn get_attacked_squares(&self, side: Side) -> FxHashSet<Square> {
        self.pieces
            .values()
            .filter(|piece| piece.side == side)
            .flat_map(|piece| piece.attack_moves(self))
            .collect()
    }

    pub fn is_square_attacked(&self, square: Square, by: Side) -> bool {
        self.pieces
            .values()
            .filter(|piece| piece.side == by)
            .any(|piece| piece.attack_moves(self).contains(&square))
    }

    pub fn check_king_under_attack(&self, side: Side) -> bool {
        match self.king_square(side) {
            Some(square) => self.is_square_attacked(square, !side),
            None => false,
        }
    }

    /// Fresh legal destinations of one piece.
    pub fn legal_moves(&mut self, id: PieceId) -> Vec<Square> {
        self.legal_candidates(id)
            .iter()
            .map(Candidate::destination)
            .collect()
    }

    /// Legal destinations of one piece, served from the cache while the position is unchanged.
    pub fn get_legal_moves_for_piece(&mut self, id: PieceId) -> Vec<Square> {
        if let Some((version, moves)) = self.legal_cache.get(&id) {
            if *version == self.version {
                return moves.clone();
            }
        }

        let moves = self.legal_moves(id);
        self.legal_cache.insert(id, (self.version, moves.clone()));
        moves
    }

    /// Every piece of `side` that can move, with its destinations.
    ///
    /// Pawns of `side` lose their en-passant eligibility here: by the time their own side
    /// is asked for moves again, the opponent has had its one reply.
    pub fn get_all_legal_moves(&mut self, side: Side) -> Vec<(PieceId, Vec<Square>)> {
        let mut all_moves = vec![];

        for id in self.pieces_of(side) {
            let moves = self.get_legal_moves_for_piece(id);

            if !moves.is_empty() {
                all_moves.push((id, moves));
            }
        }

        if self.expire_en_passant(side) {
            self.version += 1;
        }

        all_moves
    }

    pub fn has_any_legal_move(&mut self, side: Side) -> bool {
        self.pieces_of(side)
            .into_iter()
            .any(|id| !self.legal_candidates(id).is_empty())
    }

    pub fn status(&mut self) -> GameStatus {
        let side = self.side_to_move();

        if self.has_any_legal_move(side) {
            GameStatus::Ongoing
        } else if self.check_king_under_attack(side) {
            GameStatus::Checkmate { winner: !side }
        } else {
            GameStatus::Stalemate
        }
    }

    fn expire_en_passant(&mut self, side: Side) -> bool {
        let mut changed = false;

        for piece in self.pieces.values_mut() {
            if piece.side == side && piece.can_be_passanted {
                piece.can_be_passanted = false;
                changed = true;
            }
        }

        changed
    }

    /// Map the alternative click targets onto landing squares: a king aimed at its own
    /// unmoved rook means castling, a pawn aimed at an adjacent enemy pawn means en passant.
    fn normalize_destination(&self, piece: &Piece, destination: Square) -> Square {
        let Some(target) = self.occupant(destination) else {
            return destination;
        };

        match (piece.kind, target.kind) {
            (PieceKind::King, PieceKind::Rook)
                if target.side == piece.side
                    && !piece.has_moved
                    && destination.row == piece.square.row =>
            {
                let step: i8 = if destination.col < piece.square.col { -2 } else { 2 };
                piece.square.offset(0, step).unwrap_or(destination)
            }
            (PieceKind::Pawn, PieceKind::Pawn)
                if target.side != piece.side
                    && destination.row == piece.square.row
                    && destination.col.abs_diff(piece.square.col) == 1 =>
            {
                destination.offset(piece.side.forward(), 0).unwrap_or(destination)
            }
            _ => destination,
        }
    }

    /// Validate and commit one move for the side to move.
    ///
    /// Castling may be requested with either the king's landing square or the rook's square;
    /// en passant with either the landing square or the captured pawn's square.
    pub fn move_piece(&mut self, id: PieceId, destination: Square) -> Result<MoveRecord, MoveError> {
        let piece = *self.pieces.get(&id).ok_or(MoveError::UnknownPiece(id))?;

        let to_move = self.side_to_move();
        if id.side != to_move {
            return Err(MoveError::WrongSide { piece: id, to_move });
        }

        // A redirected destination only stands for castling or en passant
        let target = self.normalize_destination(&piece, destination);
        let redirected = target != destination;

        let candidate = self
            .legal_candidates(id)
            .into_iter()
            .find(|candidate| {
                candidate.destination() == target
                    && (!redirected
                        || matches!(candidate, Candidate::Castle { .. } | Candidate::EnPassant { .. }))
            })
            .ok_or(MoveError::IllegalMove {
                piece: id,
                from: piece.square,
                to: destination,
            })?;

        let record = match candidate {
            Candidate::Castle { rook, side, .. } => self.castle(id, rook, side),
            Candidate::EnPassant { to, victim } => self.en_passant(id, to, victim),
            Candidate::Quiet(to) | Candidate::Capture(to, _) => self.plain_move(id, to),
        };

        log::debug!("ply {}: {:?}", self.turn, record);

        self.move_log.push(record);
        self.expire_en_passant(!id.side);
        self.turn += 1;
        self.version += 1;

        Ok(record)
    }

    fn plain_move(&mut self, id: PieceId, to: Square) -> MoveRecord {
        let from = self.pieces[&id].square;

        let captured = self.check_capture(id, to);
        self.commit_relocation(id, to);

        MoveRecord::Plain {
            piece: id,
            from,
            to,
            captured,
        }
    }

    fn castle(&mut self, king: PieceId, rook: PieceId, side: CastleSide) -> MoveRecord {
        let (king_to, rook_to) = self.castle_targets(king, rook, side);

        self.commit_relocation(king, king_to);
        self.commit_relocation(rook, rook_to);

        MoveRecord::Castle { king, rook, side }
    }

    /// Landing squares of king and rook: the king moves two files towards the rook, the rook
    /// lands on the square the king crossed.
    pub(crate) fn castle_targets(
        &self,
        king: PieceId,
        rook: PieceId,
        side: CastleSide,
    ) -> (Square, Square) {
        let king_square = self.pieces[&king].square;
        let rook_square = self.pieces[&rook].square;

        let (king_step, rook_step) = match side {
            CastleSide::Long => (-2, 3),
            CastleSide::Short => (2, -2),
        };

        (
            Square { row: king_square.row, col: (king_square.col as i8 + king_step) as u8 },
            Square { row: rook_square.row, col: (rook_square.col as i8 + rook_step) as u8 },
        )
    }

    fn en_passant(&mut self, pawn: PieceId, to: Square, victim: PieceId) -> MoveRecord {
        let from = self.pieces[&pawn].square;

        self.archive(victim);
        self.commit_relocation(pawn, to);

        MoveRecord::EnPassant {
            pawn,
            from,
            to,
            captured: victim,
        }
    }

    /// An opposing occupant of `square` is archived as captured by `mover`.
    fn check_capture(&mut self, mover: PieceId, square: Square) -> Option<PieceId> {
        let victim = self.occupant(square).filter(|victim| victim.side != mover.side)?;
        self.archive(victim);
        Some(victim)
    }

    fn archive(&mut self, id: PieceId) {
        if let Some(mut piece) = self.lift(id) {
            log::debug!("{} captured on {}", id, piece.square);

            piece.captured = true;
            self.captured.insert(id, piece);
        }
    }

    fn commit_relocation(&mut self, id: PieceId, to: Square) {
        let Some(piece) = self.pieces.get_mut(&id) else {
            return;
        };

        let from = piece.square;
        piece.set_square(to);
        self.reindex(id, from, to);
    }

    /// Move a piece in the arena and occupancy index without touching its bookkeeping.
    pub(crate) fn relocate(&mut self, id: PieceId, to: Square) -> Option<Square> {
        let piece = self.pieces.get_mut(&id)?;
        let from = piece.square;
        piece.square = to;
        self.reindex(id, from, to);

        Some(from)
    }

    fn reindex(&mut self, id: PieceId, from: Square, to: Square) {
        if self.squares[from.row as usize][from.col as usize] == Some(id) {
            self.squares[from.row as usize][from.col as usize] = None;
        }
        self.squares[to.row as usize][to.col as usize] = Some(id);
    }

    /// Take a piece off the board entirely; the caller decides whether it comes back.
    pub(crate) fn lift(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;

        if self.squares[piece.square.row as usize][piece.square.col as usize] == Some(id) {
            self.squares[piece.square.row as usize][piece.square.col as usize] = None;
        }

        Some(piece)
    }

    pub(crate) fn restore(&mut self, id: PieceId, piece: Piece) {
        self.insert(id, piece);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;

            for col in 0..8 {
                let symbol = match self.squares[row][col] {
                    Some(id) if id.side == Side::White => id.kind.to_char().to_ascii_uppercase(),
                    Some(id) => id.kind.to_char(),
                    None => '.',
                };
                write!(f, "{}", symbol)?;
            }

            writeln!(f)?;
        }

        write!(f, "  abcdefgh")
    }
}
