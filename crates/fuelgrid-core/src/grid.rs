//! The [`Grid`] draw buffer and frame diffing.
//!
//! A model draws into a `Grid` every frame; [`compute_frame`] reduces two
//! successive grids to the cells that changed so drivers only repaint those.

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Style;

/// A screen-sized buffer of styled [`Cell`]s, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Grid {
    /// A blank `width` × `height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p).then(|| (p.y * self.width() + p.x) as usize)
    }

    /// The cell at `p`; a blank outside the grid.
    pub fn at(&self, p: Point) -> Cell {
        self.index(p).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Writes outside the grid are dropped.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `text` left to right starting at `p`, clipping at the right
    /// edge. Returns the number of cells written.
    pub fn draw_text(&mut self, p: Point, text: &str, style: Style) -> usize {
        let mut n = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if !self.contains(q) {
                break;
            }
            self.set(q, Cell::new(ch).with_style(style));
            n += 1;
        }
        n
    }

    /// Cells with their positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Diffing
// ---------------------------------------------------------------------------

/// A cell to repaint.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// What changed on screen since the last flush.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// The cells of `curr` that differ from `prev`. Cells `prev` does not cover
/// count as changed.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, cell)| !prev.contains(p) || prev.at(p) != cell)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn grid_new_and_at() {
        let g = Grid::new(4, 3);
        assert_eq!(g.size(), Point::new(4, 3));
        assert_eq!(g.at(Point::new(0, 0)), Cell::default());
    }

    #[test]
    fn grid_set_and_get() {
        let mut g = Grid::new(4, 3);
        g.set(Point::new(2, 1), Cell::new('X'));
        assert_eq!(g.at(Point::new(2, 1)).ch, 'X');
        g.set(Point::new(10, 10), Cell::new('Y'));
        assert_eq!(g.at(Point::new(10, 10)), Cell::default());
    }

    #[test]
    fn draw_text_clips_at_edge() {
        let mut g = Grid::new(5, 1);
        let style = Style::PLAIN.with_fg(Color::rgb(1, 2, 3));
        let n = g.draw_text(Point::new(2, 0), "fuel", style);
        assert_eq!(n, 3);
        assert_eq!(g.at(Point::new(2, 0)).ch, 'f');
        assert_eq!(g.at(Point::new(4, 0)).ch, 'e');
        assert_eq!(g.at(Point::new(4, 0)).style, style);
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(3, 2);
        let mut b = Grid::new(3, 2);
        b.set(Point::new(1, 0), Cell::new('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].cell.ch, 'A');
    }

    #[test]
    fn compute_frame_after_grow_repaints_new_area() {
        let a = Grid::new(2, 1);
        let b = Grid::new(3, 1);
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(2, 0));
    }
}
