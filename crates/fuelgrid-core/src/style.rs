//! Cell styling: [`Color`], [`AttrMask`], [`Style`].

use std::ops::BitOr;

/// A cell colour. [`Color::Default`] leaves the terminal's own colour in
/// place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    #[default]
    Default,
    Rgb(u8, u8, u8),
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }
}

/// Text attributes, combined with `|`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrMask(u8);

impl AttrMask {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(0b001);
    pub const REVERSE: Self = Self(0b010);
    pub const DIM: Self = Self(0b100);

    /// Every bit of `flags` is set.
    pub const fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttrMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Foreground, background and attributes of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: AttrMask,
}

impl Style {
    /// Terminal colours, no attributes.
    pub const PLAIN: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: AttrMask::NONE,
    };

    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    pub const fn with_attrs(self, attrs: AttrMask) -> Self {
        Self { attrs, ..self }
    }
}
