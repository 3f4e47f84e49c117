//! The [`Path`] returned by a successful search, and route replay.

use std::fmt;

use fuelgrid_core::Point;

use crate::traits::FuelMap;

/// An ordered route of cells, start and goal inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Path {
    cells: Vec<Point>,
}

impl Path {
    /// Wrap a cell sequence. No validation is done; see [`replay`](Self::replay).
    pub fn new(cells: Vec<Point>) -> Self {
        Self { cells }
    }

    /// The cells in travel order.
    #[inline]
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// Number of cells, endpoints included.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves (`len - 1`), zero for an empty path.
    #[inline]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    #[inline]
    pub fn first(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Point> {
        self.cells.last().copied()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.cells.contains(&p)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.cells.iter()
    }

    /// Drive the route on `map` and return the fuel left on arrival at each
    /// cell. Entry 0 is the start, which begins with a full tank.
    ///
    /// Fails on the first cell that breaks a rule of the fuel model.
    pub fn replay<M: FuelMap>(&self, map: &M) -> Result<Vec<u32>, PathError> {
        let Some(&first) = self.cells.first() else {
            return Err(PathError::Empty);
        };
        if first != map.start() {
            return Err(PathError::WrongStart(first));
        }
        if !map.is_valid(first) {
            return Err(PathError::Blocked { index: 0 });
        }
        let last = self.cells[self.cells.len() - 1];
        if last != map.goal() {
            return Err(PathError::WrongGoal(last));
        }

        let capacity = map.fuel_capacity();
        let mut fuel = capacity;
        let mut profile = Vec::with_capacity(self.cells.len());
        profile.push(fuel);
        for (index, pair) in self.cells.windows(2).enumerate() {
            let index = index + 1;
            let (prev, cur) = (pair[0], pair[1]);
            if !prev.is_adjacent(cur) {
                return Err(PathError::NotAdjacent { index });
            }
            if !map.is_valid(cur) {
                return Err(PathError::Blocked { index });
            }
            fuel = if map.is_fuel_station(cur) {
                capacity
            } else {
                fuel.checked_sub(1).ok_or(PathError::OutOfFuel { index })?
            };
            profile.push(fuel);
        }
        Ok(profile)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl From<Vec<Point>> for Path {
    fn from(cells: Vec<Point>) -> Self {
        Self::new(cells)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Reasons a route is not drivable on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// The route has no cells.
    Empty,
    /// The route does not begin at the map's start.
    WrongStart(Point),
    /// The route does not end at the map's goal.
    WrongGoal(Point),
    /// Cell `index` is not a cardinal neighbour of the previous cell.
    NotAdjacent { index: usize },
    /// Cell `index` is a wall or out of bounds.
    Blocked { index: usize },
    /// The tank runs dry before reaching cell `index`.
    OutOfFuel { index: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("path is empty"),
            Self::WrongStart(p) => write!(f, "path starts at {p}, not at the map start"),
            Self::WrongGoal(p) => write!(f, "path ends at {p}, not at the map goal"),
            Self::NotAdjacent { index } => {
                write!(f, "path cell {index} is not adjacent to the previous cell")
            }
            Self::Blocked { index } => write!(f, "path cell {index} is not walkable"),
            Self::OutOfFuel { index } => write!(f, "out of fuel before path cell {index}"),
        }
    }
}

impl std::error::Error for PathError {}
