//! Fuel-constrained pathfinding on 4-connected grids.
//!
//! [`FuelPathFinder`] finds the shortest route from a map's start to its goal
//! for a vehicle that burns one unit of fuel per move and refills to full
//! capacity whenever it arrives on a fuel station. The search runs A\* over
//! (cell, remaining fuel) states with a Manhattan heuristic and prunes a state
//! when its cell was already expanded with at least as much fuel.
//!
//! Maps are read through the [`FuelMap`] trait, so any grid representation
//! can be searched.
//!
//! ```
//! # use fuelgrid_core::Point;
//! # use fuelgrid_paths::{FuelMap, FuelPathFinder};
//! struct Corridor;
//!
//! impl FuelMap for Corridor {
//!     fn is_valid(&self, p: Point) -> bool {
//!         p.y == 0 && (0..4).contains(&p.x)
//!     }
//!     fn start(&self) -> Point { Point::new(0, 0) }
//!     fn goal(&self) -> Point { Point::new(3, 0) }
//!     fn fuel_capacity(&self) -> u32 { 3 }
//!     fn is_fuel_station(&self, _: Point) -> bool { false }
//! }
//!
//! let path = FuelPathFinder::new(&Corridor).find_path().unwrap();
//! assert_eq!(path.steps(), 3);
//! ```

mod distance;
mod finder;
mod neighbors;
mod path;
mod traits;

#[cfg(test)]
mod test_map;

pub use distance::manhattan;
pub use finder::{
    FuelPathFinder, SearchError, SearchLimits, SearchOutcome, SearchReport, SearchStats,
};
pub use neighbors::{CARDINALS, cardinal};
pub use path::{Path, PathError};
pub use traits::FuelMap;
