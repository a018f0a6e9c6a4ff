use super::square::Square;

pub const MAX_RAY_LENGTH: usize = 7;
pub const MAX_KNIGHT_JUMPS: usize = 8;

/// Squares in one fixed direction from a source square, nearest first.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    squares: [Square; MAX_RAY_LENGTH],
    len: u8,
}

impl Ray {
    const EMPTY: Ray = Ray {
        squares: [Square::A8; MAX_RAY_LENGTH],
        len: 0,
    };

    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    UpLeft = 4,
    UpRight = 5,
    DownRight = 6,
    DownLeft = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// (row, col) step; "up" is towards row 0.
    pub const fn delta(self) -> [i8; 2] {
        match self {
            Direction::Up => [-1, 0],
            Direction::Down => [1, 0],
            Direction::Left => [0, -1],
            Direction::Right => [0, 1],
            Direction::UpLeft => [-1, -1],
            Direction::UpRight => [-1, 1],
            Direction::DownRight => [1, 1],
            Direction::DownLeft => [1, -1],
        }
    }
}

const KNIGHT_DELTAS: [[i8; 2]; 8] = [
    [-2, -1],
    [-2, 1],
    [2, -1],
    [2, 1],
    [-1, -2],
    [-1, 2],
    [1, -2],
    [1, 2],
];

/// Per-square rays and knight jumps, ignoring occupancy.
pub struct GeometryTables {
    rays: [[Ray; 8]; 64],
    knight_jumps: [[Square; MAX_KNIGHT_JUMPS]; 64],
    knight_jump_counts: [u8; 64],
}

const fn create_ray(square: Square, direction: Direction) -> Ray {
    let mut ray = Ray::EMPTY;
    let [d_row, d_col] = direction.delta();

    let mut current = square.offset(d_row, d_col);
    while let Some(next) = current {
        ray.squares[ray.len as usize] = next;
        ray.len += 1;
        current = next.offset(d_row, d_col);
    }

    ray
}

impl GeometryTables {
    pub const fn new() -> Self {
        let mut rays = [[Ray::EMPTY; 8]; 64];
        let mut knight_jumps = [[Square::A8; MAX_KNIGHT_JUMPS]; 64];
        let mut knight_jump_counts = [0u8; 64];

        let mut index = 0;
        while index < 64 {
            let square = Square::from_index(index);

            let mut direction = 0;
            while direction < 8 {
                rays[index][direction] = create_ray(square, Direction::ALL[direction]);
                direction += 1;
            }

            let mut jump = 0;
            while jump < KNIGHT_DELTAS.len() {
                if let Some(target) = square.offset(KNIGHT_DELTAS[jump][0], KNIGHT_DELTAS[jump][1]) {
                    knight_jumps[index][knight_jump_counts[index] as usize] = target;
                    knight_jump_counts[index] += 1;
                }
                jump += 1;
            }

            index += 1;
        }

        Self {
            rays,
            knight_jumps,
            knight_jump_counts,
        }
    }

    pub fn ray(&self, square: Square, direction: Direction) -> &[Square] {
        self.rays[square.index()][direction as usize].as_slice()
    }

    /// The four orthogonal rays: up, down, left, right.
    pub fn straights(&self, square: Square) -> &[Ray] {
        &self.rays[square.index()][..4]
    }

    /// The four diagonal rays: up-left, up-right, down-right, down-left.
    pub fn diagonals(&self, square: Square) -> &[Ray] {
        &self.rays[square.index()][4..]
    }

    pub fn knight_jumps(&self, square: Square) -> &[Square] {
        let index = square.index();
        &self.knight_jumps[index][..self.knight_jump_counts[index] as usize]
    }
}

pub static GEOMETRY: GeometryTables = GeometryTables::new();
