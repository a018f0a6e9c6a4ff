use crate::game::{Board, Side, Square};
use fxhash::FxHashSet;

const RESET: &str = "\x1b[0m";
const LIGHT_SQUARE_BG: &str = "\x1b[48;5;172m";
const DARK_SQUARE_BG: &str = "\x1b[48;5;130m";
const WHITE_PIECE: &str = "\x1b[1;97m";
const BLACK_PIECE: &str = "\x1b[1;30m";
const MOVE_HIGHLIGHT: &str = "\x1b[1;34m";
const HEADING_BG: &str = "\x1b[48;5;240m"; // Neutral gray background

/// Colour board with a side-to-move heading; `possible_moves` are marked with a dot,
/// or tinted when a capture lands there.
pub fn render_with_moves(board: &Board, possible_moves: &[Square]) -> String {
    let side = board.side_to_move();
    let heading_text = format!("{} to move", side);
    let heading_color = match side {
        Side::White => WHITE_PIECE,
        Side::Black => BLACK_PIECE,
    };

    // 8 squares * 3 chars each, plus the rank label
    let board_width = 24;
    let padding = (board_width - heading_text.len()) / 2;
    let right_padding = board_width - heading_text.len() - padding;

    let mut output = format!(
        "  {}{}{}{}{}{}\n",
        HEADING_BG,
        " ".repeat(padding),
        heading_color,
        heading_text,
        " ".repeat(right_padding),
        RESET
    );

    let move_squares: FxHashSet<Square> = possible_moves.iter().copied().collect();

    for row in 0..8u8 {
        let mut line = format!("{} ", 8 - row);

        for col in 0..8u8 {
            let square = Square { row, col };
            let bg_color = if (row + col) % 2 == 0 {
                LIGHT_SQUARE_BG
            } else {
                DARK_SQUARE_BG
            };
            line.push_str(bg_color);

            match board.occupant(square) {
                Some(id) => {
                    let piece_color = if move_squares.contains(&square) {
                        MOVE_HIGHLIGHT
                    } else {
                        match id.side {
                            Side::White => WHITE_PIECE,
                            Side::Black => BLACK_PIECE,
                        }
                    };
                    line.push_str(&format!("{} {} {}", piece_color, id.kind.to_emoji(), RESET));
                }
                None if move_squares.contains(&square) => {
                    line.push_str(&format!("{} ● {}", MOVE_HIGHLIGHT, RESET));
                }
                None => line.push_str("   "),
            }

            line.push_str(RESET);
        }

        output.push_str(&line);
        output.push('\n');
    }

    output.push_str("   a  b  c  d  e  f  g  h");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_names_the_side_to_move() {
        let board = Board::new();
        let text = render_with_moves(&board, &[]);

        assert!(text.lines().next().unwrap().contains("White to move"));
        assert_eq!(text.lines().count(), 10);
        assert!(!text.contains('●'));
    }

    #[test]
    fn empty_destinations_are_dotted() {
        let board = Board::new();
        let text = render_with_moves(&board, &[Square::E3, Square::E4]);

        assert_eq!(text.matches('●').count(), 2);
    }
}
