pub mod board_view;
pub mod controller;

pub use board_view::*;
pub use controller::*;
