//! Fuel Puzzle: break walls and place fuel stations until a fuel-limited car
//! can reach the goal, then watch it drive.

pub mod draw;
pub mod model;
pub mod solve;

pub use model::{PuzzleConfig, PuzzleModel, UI_HEIGHT, UI_WIDTH};
pub use solve::{SolveError, parse_point, solve};
