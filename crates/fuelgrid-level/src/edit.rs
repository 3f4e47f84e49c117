//! Player edits between searches: breaking walls and placing fuel stations.

use std::fmt;

use fuelgrid_core::Point;

use crate::map::GridMap;
use crate::tile::Tile;

/// A successful edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    WallBroken(Point),
    StationPlaced(Point),
}

/// Why an edit was refused. The map is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    /// Outside the map, or on row padding.
    OutOfBounds(Point),
    /// The start and goal cannot be edited.
    Protected(Point),
    NoBreaksLeft,
    NoStationsLeft,
    /// The floor cell already has a fuel station.
    Occupied(Point),
    /// Only walls can be broken.
    NotAWall(Point),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "{p} is outside the map"),
            Self::Protected(p) => write!(f, "{p} is the start or the goal"),
            Self::NoBreaksLeft => f.write_str("no wall breaks left"),
            Self::NoStationsLeft => f.write_str("no fuel stations left"),
            Self::Occupied(p) => write!(f, "{p} already has a fuel station"),
            Self::NotAWall(p) => write!(f, "{p} is not a wall"),
        }
    }
}

impl std::error::Error for EditError {}

/// A map being prepared by the player, with the remaining edit budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    map: GridMap,
    breaks_left: u32,
    stations_left: u32,
}

impl Editor {
    pub fn new(map: GridMap, breaks: u32, stations: u32) -> Self {
        Self {
            map,
            breaks_left: breaks,
            stations_left: stations,
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn breaks_left(&self) -> u32 {
        self.breaks_left
    }

    pub fn stations_left(&self) -> u32 {
        self.stations_left
    }

    /// Apply whatever edit a click on `p` means: break a wall, or place a
    /// fuel station on plain floor.
    pub fn click(&mut self, p: Point) -> Result<Edit, EditError> {
        match self.editable(p)? {
            Tile::Wall => self.break_wall(p),
            _ => self.place_station(p),
        }
    }

    /// Turn the wall at `p` into floor, spending one break.
    pub fn break_wall(&mut self, p: Point) -> Result<Edit, EditError> {
        if self.editable(p)? != Tile::Wall {
            return Err(EditError::NotAWall(p));
        }
        if self.breaks_left == 0 {
            return Err(EditError::NoBreaksLeft);
        }
        self.map.set_tile(p, Tile::Floor);
        self.breaks_left -= 1;
        log::debug!("broke wall at {p}, {} breaks left", self.breaks_left);
        Ok(Edit::WallBroken(p))
    }

    /// Put a fuel station on the floor cell `p`, spending one station.
    pub fn place_station(&mut self, p: Point) -> Result<Edit, EditError> {
        if self.editable(p)? != Tile::Floor || self.map.is_fuel_station(p) {
            return Err(EditError::Occupied(p));
        }
        if self.stations_left == 0 {
            return Err(EditError::NoStationsLeft);
        }
        self.map.add_fuel_station(p);
        self.stations_left -= 1;
        log::debug!("placed station at {p}, {} stations left", self.stations_left);
        Ok(Edit::StationPlaced(p))
    }

    fn editable(&self, p: Point) -> Result<Tile, EditError> {
        match self.map.tile(p) {
            None | Some(Tile::Void) => Err(EditError::OutOfBounds(p)),
            Some(Tile::Start | Tile::Goal) => Err(EditError::Protected(p)),
            Some(tile) => Ok(tile),
        }
    }
}
