//! Map tile tags.

/// What occupies a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Start,
    Goal,
    /// Padding past the end of a short level row. Never walkable or editable.
    Void,
}

impl Tile {
    /// Whether a vehicle may drive onto this tile.
    #[inline]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Start | Self::Goal)
    }

    /// The level-file character for this tile.
    pub const fn to_char(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => 'X',
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Void => ' ',
        }
    }
}
