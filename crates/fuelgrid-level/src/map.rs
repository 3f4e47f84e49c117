//! [`GridMap`]: the editable puzzle map searched by the pathfinder.

use std::collections::BTreeSet;
use std::fmt;

use fuelgrid_core::{Point, Range};
use fuelgrid_paths::{FuelMap, Path};

use crate::tile::Tile;

/// A rectangular map of [`Tile`]s with a start, a goal, a fuel capacity and a
/// set of fuel stations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
    start: Point,
    goal: Point,
    fuel_capacity: u32,
    fuel_stations: BTreeSet<Point>,
}

impl GridMap {
    /// An all-floor map with `start` and `goal` marked.
    ///
    /// Endpoints outside the map are ignored when marking; callers are
    /// expected to pass in-bounds cells.
    pub fn new(width: i32, height: i32, fuel_capacity: u32, start: Point, goal: Point) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        let mut map = Self {
            tiles: vec![Tile::Floor; bounds.len()],
            width: bounds.width(),
            height: bounds.height(),
            start,
            goal,
            fuel_capacity,
            fuel_stations: BTreeSet::new(),
        };
        map.set_tile(start, Tile::Start);
        map.set_tile(goal, Tile::Goal);
        map
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds().contains(p) {
            return None;
        }
        Some((p.y * self.width + p.x) as usize)
    }

    /// The tile at `p`, or `None` outside the map.
    pub fn tile(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Overwrite the tile at `p`. Returns `false` if `p` is outside the map.
    pub fn set_tile(&mut self, p: Point, tile: Tile) -> bool {
        match self.index(p) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// In bounds and walkable.
    pub fn is_valid(&self, p: Point) -> bool {
        self.tile(p).is_some_and(Tile::is_walkable)
    }

    pub fn is_fuel_station(&self, p: Point) -> bool {
        self.fuel_stations.contains(&p)
    }

    /// Mark `p` as a fuel station. Returns `false` if it already was one.
    pub fn add_fuel_station(&mut self, p: Point) -> bool {
        self.fuel_stations.insert(p)
    }

    /// Fuel stations in row-major order.
    pub fn fuel_stations(&self) -> impl Iterator<Item = Point> + '_ {
        self.fuel_stations.iter().copied()
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn fuel_capacity(&self) -> u32 {
        self.fuel_capacity
    }

    /// ASCII picture of the map in level-file characters, with `route`
    /// drawn as `*` over plain floor.
    pub fn ascii(&self, route: Option<&Path>) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            let mut line = String::with_capacity(self.width as usize);
            for x in 0..self.width {
                let p = Point::new(x, y);
                let tile = self.tile(p).unwrap_or(Tile::Void);
                let ch = match tile {
                    Tile::Floor if self.is_fuel_station(p) => 'F',
                    Tile::Floor if route.is_some_and(|r| r.contains(p)) => '*',
                    t => t.to_char(),
                };
                line.push(ch);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ascii(None))
    }
}

impl FuelMap for GridMap {
    fn is_valid(&self, p: Point) -> bool {
        GridMap::is_valid(self, p)
    }

    fn start(&self) -> Point {
        self.start
    }

    fn goal(&self) -> Point {
        self.goal
    }

    fn fuel_capacity(&self) -> u32 {
        self.fuel_capacity
    }

    fn is_fuel_station(&self, p: Point) -> bool {
        GridMap::is_fuel_station(self, p)
    }
}
