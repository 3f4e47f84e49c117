//! [`Cell`]: one character of the draw grid.

use crate::style::Style;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// `ch` in the plain style.
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            style: Style::PLAIN,
        }
    }

    pub const fn with_style(self, style: Style) -> Self {
        Self { style, ..self }
    }
}

/// A blank.
impl Default for Cell {
    fn default() -> Self {
        Self::new(' ')
    }
}
