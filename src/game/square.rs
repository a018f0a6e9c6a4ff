use std::fmt;

/// A board coordinate. Row 0 is Black's back rank (rank 8), column 0 is the a-file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

macro_rules! rank_squares {
    ($row:expr => $a:ident $b:ident $c:ident $d:ident $e:ident $f:ident $g:ident $h:ident) => {
        pub const $a: Square = Square { row: $row, col: 0 };
        pub const $b: Square = Square { row: $row, col: 1 };
        pub const $c: Square = Square { row: $row, col: 2 };
        pub const $d: Square = Square { row: $row, col: 3 };
        pub const $e: Square = Square { row: $row, col: 4 };
        pub const $f: Square = Square { row: $row, col: 5 };
        pub const $g: Square = Square { row: $row, col: 6 };
        pub const $h: Square = Square { row: $row, col: 7 };
    };
}

impl Square {
    rank_squares!(0 => A8 B8 C8 D8 E8 F8 G8 H8);
    rank_squares!(1 => A7 B7 C7 D7 E7 F7 G7 H7);
    rank_squares!(2 => A6 B6 C6 D6 E6 F6 G6 H6);
    rank_squares!(3 => A5 B5 C5 D5 E5 F5 G5 H5);
    rank_squares!(4 => A4 B4 C4 D4 E4 F4 G4 H4);
    rank_squares!(5 => A3 B3 C3 D3 E3 F3 G3 H3);
    rank_squares!(6 => A2 B2 C2 D2 E2 F2 G2 H2);
    rank_squares!(7 => A1 B1 C1 D1 E1 F1 G1 H1);

    pub const fn new(row: u8, col: u8) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Step by a (row, col) delta, `None` when it would leave the board.
    pub const fn offset(&self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;

        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub const fn index(&self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    pub const fn from_index(index: usize) -> Square {
        Square {
            row: (index / 8) as u8,
            col: (index % 8) as u8,
        }
    }

    /// Chebyshev distance, the number of king steps between two squares.
    pub fn distance(&self, other: Square) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    pub fn rank(&self) -> u8 {
        8 - self.row
    }

    pub fn file(&self) -> char {
        (b'a' + self.col) as char
    }

    pub fn parse(string: &str) -> Option<Square> {
        let mut chars = string.chars();

        match (chars.next(), chars.next(), chars.next()) {
            (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) => {
                Square::new(b'8' - rank as u8, file as u8 - b'a')
            }
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_names() {
        assert_eq!(Square::parse("a8"), Some(Square::A8));
        assert_eq!(Square::parse("e2"), Some(Square { row: 6, col: 4 }));
        assert_eq!(Square::parse("h1"), Some(Square::H1));

        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::parse("e2e4"), None);
        assert_eq!(Square::parse(""), None);
    }

    #[test]
    fn ranks_count_from_whites_side() {
        assert_eq!(Square::E2.rank(), 2);
        assert_eq!(Square::E2.to_string(), "e2");
        assert_eq!(Square::D8.to_string(), "d8");
    }

    #[test]
    fn rejects_out_of_board_coordinates() {
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::new(0, 8), None);
        assert_eq!(Square::A1.offset(1, 0), None);
        assert_eq!(Square::A1.offset(-1, 1), Some(Square::B2));
    }
}
