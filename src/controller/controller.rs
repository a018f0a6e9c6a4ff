use crate::controller::board_view::render_with_moves;
use crate::game::{Board, GameStatus, MoveError, MoveRecord, PieceId, RuleOptions, Side, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use thiserror::Error;

pub struct GameController {
    pub board: Board,
    pub options: RuleOptions,
    pub parallel_perft: bool,
    pub seed: u64,
    selected: Option<Square>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResultType {
    Success,                // move committed
    InvalidNotation,        // not a `<from><to>` pair like e2e4
    InvalidMove,            // refused by the rules engine
    GameOver(GameStatus),   // nothing left to play
}

/// Raised when a random playout catches the engine breaking its own rules.
#[derive(Error, Debug)]
pub enum PlayoutError {
    #[error("ply {ply}: {side} left its own king in check with {record:?}")]
    SelfCheck {
        ply: usize,
        side: Side,
        record: MoveRecord,
    },

    #[error("ply {ply}: listed move was refused: {source}")]
    Refused {
        ply: usize,
        #[source]
        source: MoveError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayoutReport {
    pub plies: usize,
    pub captures: usize,
    pub status: GameStatus,
}

impl fmt::Display for PlayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "played {} plies, {} captures, final status {:?}",
            self.plies, self.captures, self.status
        )
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten per-piece destination lists into single moves.
fn flatten(moves: Vec<(PieceId, Vec<Square>)>) -> Vec<(PieceId, Square)> {
    moves
        .into_iter()
        .flat_map(|(id, destinations)| destinations.into_iter().map(move |to| (id, to)))
        .collect()
}

/// Leaf count below `initial_move`, played on a copy of `board`.
fn count_moves(board: &Board, initial_move: (PieceId, Square), depth: usize) -> usize {
    if depth <= 1 {
        return 1;
    }

    let mut board = board.clone();
    let (id, to) = initial_move;
    if let Err(error) = board.move_piece(id, to) {
        log::warn!("perft: listed move {} {} refused: {}", id, to, error);
        return 0;
    }

    let side = board.side_to_move();
    let moves = board.get_all_legal_moves(side);

    // Bulk counting
    if depth == 2 {
        return moves.iter().map(|(_, destinations)| destinations.len()).sum();
    }

    flatten(moves)
        .into_iter()
        .map(|board_move| count_moves(&board, board_move, depth - 1))
        .sum()
}

impl GameController {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            options: RuleOptions::default(),
            parallel_perft: true,
            seed: 0,
            selected: None,
        }
    }

    pub fn new_game(&mut self) {
        self.board = Board::with_options(self.options);
        self.selected = None;
    }

    pub fn set_option(&mut self, name: &str, value: &str) {
        match name.to_lowercase().as_str() {
            "strictcastling" => match value.to_lowercase().as_str() {
                "true" => self.set_strict_castling(true),
                "false" => self.set_strict_castling(false),
                _ => eprintln!(
                    "Invalid value for StrictCastling option: {}. Expected 'true' or 'false'",
                    value
                ),
            },
            "parallelperft" => match value.to_lowercase().as_str() {
                "true" => self.parallel_perft = true,
                "false" => self.parallel_perft = false,
                _ => eprintln!(
                    "Invalid value for ParallelPerft option: {}. Expected 'true' or 'false'",
                    value
                ),
            },
            "seed" => match value.parse::<u64>() {
                Ok(seed) => self.seed = seed,
                Err(_) => eprintln!(
                    "Invalid value for Seed option: {}. Expected numeric value",
                    value
                ),
            },
            _ => {
                eprintln!("Unknown option: {}", name);
            }
        }
    }

    fn set_strict_castling(&mut self, strict: bool) {
        self.options.strict_castling = strict;
        self.board.set_options(self.options);
    }

    /// Parse long algebraic notation without promotion, e.g. `e2e4`.
    pub fn parse_move(notation: &str) -> Option<(Square, Square)> {
        if notation.len() != 4 {
            return None;
        }

        Some((
            Square::parse(notation.get(0..2)?)?,
            Square::parse(notation.get(2..4)?)?,
        ))
    }

    pub fn try_move_piece(&mut self, long_algebraic_notation: &str) -> MoveResultType {
        let status = self.board.status();
        if status != GameStatus::Ongoing {
            return MoveResultType::GameOver(status);
        }

        let Some((from, to)) = Self::parse_move(long_algebraic_notation) else {
            return MoveResultType::InvalidNotation;
        };

        let Some(id) = self.board.occupant(from) else {
            log::info!("no piece on {}", from);
            return MoveResultType::InvalidMove;
        };

        match self.board.move_piece(id, to) {
            Ok(record) => {
                log::info!("{:?}", record);
                self.selected = None;
                MoveResultType::Success
            }
            Err(error) => {
                log::info!("{}", error);
                MoveResultType::InvalidMove
            }
        }
    }

    /// Legal destinations of whatever stands on `square`.
    pub fn legal_destinations(&mut self, square: Square) -> Vec<Square> {
        match self.board.occupant(square) {
            Some(id) => self.board.get_legal_moves_for_piece(id),
            None => vec![],
        }
    }

    /// Remember `square` as the selected one and return its legal destinations.
    pub fn select(&mut self, square: Square) -> Vec<Square> {
        self.selected = Some(square);
        self.legal_destinations(square)
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn status_line(&mut self) -> String {
        let side = self.board.side_to_move();

        match self.board.status() {
            GameStatus::Ongoing if self.board.check_king_under_attack(side) => {
                format!("{} to move, in check", side)
            }
            GameStatus::Ongoing => format!("{} to move", side),
            GameStatus::Checkmate { winner } => format!("Checkmate, {} wins", winner),
            GameStatus::Stalemate => "Stalemate".to_string(),
        }
    }

    pub fn render(&mut self) -> String {
        let highlights = match self.selected {
            Some(square) => self.legal_destinations(square),
            None => vec![],
        };

        render_with_moves(&self.board, &highlights)
    }

    /// Per-root-move leaf counts at `depth`. Depth counts from 1, so depth 0 has no
    /// root moves to break down and returns nothing.
    pub fn perft(&self, depth: usize) -> Vec<(PieceId, Square, usize)> {
        if depth == 0 {
            return vec![];
        }

        let mut board = self.board.clone();
        let side = board.side_to_move();
        let root = flatten(board.get_all_legal_moves(side));

        let count = |&(id, to): &(PieceId, Square)| (id, to, count_moves(&board, (id, to), depth));

        if self.parallel_perft {
            root.par_iter().map(count).collect()
        } else {
            root.iter().map(count).collect()
        }
    }

    /// Play up to `plies` random legal moves from the current position.
    ///
    /// After every move the mover's king is checked again; finding it attacked is an error.
    pub fn playout(&mut self, plies: usize) -> Result<PlayoutReport, PlayoutError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut report = PlayoutReport {
            plies: 0,
            captures: 0,
            status: GameStatus::Ongoing,
        };

        for ply in 0..plies {
            let side = self.board.side_to_move();
            let moves = flatten(self.board.get_all_legal_moves(side));

            if moves.is_empty() {
                break;
            }

            let (id, to) = moves[rng.random_range(0..moves.len())];
            let record = self
                .board
                .move_piece(id, to)
                .map_err(|source| PlayoutError::Refused { ply, source })?;

            if self.board.check_king_under_attack(side) {
                return Err(PlayoutError::SelfCheck { ply, side, record });
            }

            report.plies += 1;
            if record.captured().is_some() {
                report.captures += 1;
            }
        }

        self.selected = None;
        report.status = self.board.status();

        log::info!("playout (seed {}): {}", self.seed, report);

        Ok(report)
    }
}
