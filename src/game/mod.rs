pub mod board;
pub mod error;
pub mod geometry;
pub mod movegen;
pub mod pieces;
pub mod simulate;
pub mod square;

pub use board::*;
pub use error::*;
pub use movegen::Candidate;
pub use pieces::*;
pub use square::*;
