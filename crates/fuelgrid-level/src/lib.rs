//! Puzzle maps for fuelgrid.
//!
//! A [`Level`] is parsed from a small text format into a [`GridMap`] plus the
//! player's budgets. The [`Editor`] applies the player's clicks (breaking
//! walls, placing fuel stations) to a copy of that map, which is then handed
//! to [`fuelgrid_paths::FuelPathFinder`] through its [`FuelMap`](fuelgrid_paths::FuelMap)
//! implementation.

pub mod edit;
pub mod level;
pub mod map;
pub mod tile;

pub use edit::{Edit, EditError, Editor};
pub use level::{Level, LevelError, MAX_HEIGHT, MAX_WIDTH, level_path};
pub use map::GridMap;
pub use tile::Tile;
