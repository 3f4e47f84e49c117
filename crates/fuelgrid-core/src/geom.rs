//! Grid coordinates: [`Point`] and the rectangle [`Range`].

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// A cell coordinate; `x` grows to the right and `y` downwards.
///
/// Points order row by row: first by `y`, then by `x`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// One orthogonal step away from `other`.
    pub fn is_adjacent(self, other: Point) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, d: Self) -> Self {
        self.shift(d.x, d.y)
    }
}

/// The cells `min.x <= x < max.x`, `min.y <= y < max.y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The rectangle from corner `(x0, y0)` up to, not including, `(x1, y1)`.
    /// A corner past the other one gives an empty range.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    pub fn width(self) -> i32 {
        (self.max.x - self.min.x).max(0)
    }

    pub fn height(self) -> i32 {
        (self.max.y - self.min.y).max(0)
    }

    /// `(width, height)` as a point.
    pub fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    pub fn len(self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every cell, row by row.
    pub fn iter(self) -> impl Iterator<Item = Point> + Clone {
        let (min, max) = (self.min, self.max);
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| Point::new(x, y)))
    }
}
