//! A minimal ASCII-backed [`FuelMap`] for unit tests.
//!
//! `.` floor, `X` wall, `S` start, `G` goal, `F` floor with a fuel station.

use std::collections::HashSet;

use fuelgrid_core::Point;

use crate::traits::FuelMap;

pub(crate) struct AsciiMap {
    pub(crate) rows: Vec<Vec<char>>,
    pub(crate) start: Point,
    pub(crate) goal: Point,
    pub(crate) capacity: u32,
    pub(crate) stations: HashSet<Point>,
}

impl AsciiMap {
    pub(crate) fn new(rows: &[&str], capacity: u32) -> Self {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let mut start = None;
        let mut goal = None;
        let mut stations = HashSet::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                let p = Point::new(x as i32, y as i32);
                match ch {
                    'S' => start = Some(p),
                    'G' => goal = Some(p),
                    'F' => {
                        stations.insert(p);
                    }
                    _ => {}
                }
            }
        }
        Self {
            rows,
            start: start.expect("test map needs an S"),
            goal: goal.expect("test map needs a G"),
            capacity,
            stations,
        }
    }

    pub(crate) fn width(&self) -> i32 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as i32
    }

    pub(crate) fn height(&self) -> i32 {
        self.rows.len() as i32
    }
}

impl FuelMap for AsciiMap {
    fn is_valid(&self, p: Point) -> bool {
        if p.x < 0 || p.y < 0 {
            return false;
        }
        self.rows
            .get(p.y as usize)
            .and_then(|row| row.get(p.x as usize))
            .is_some_and(|&ch| ch != 'X')
    }

    fn start(&self) -> Point {
        self.start
    }

    fn goal(&self) -> Point {
        self.goal
    }

    fn fuel_capacity(&self) -> u32 {
        self.capacity
    }

    fn is_fuel_station(&self, p: Point) -> bool {
        self.stations.contains(&p)
    }
}
