//! Level files.
//!
//! A level is a text file whose first line holds three comma-separated
//! numbers, `fuel_capacity,break_limit,max_stations`, followed by the map
//! rows:
//!
//! ```text
//! 4,1,1
//! S..X..
//! ..XX..
//! .....G
//! ```
//!
//! `.` floor, `X` wall, `S` start, `G` goal, `F` floor with a fixed fuel
//! station. Every line is trimmed and blank lines are skipped. Rows may differ
//! in length; the map is as wide as the longest row and short rows are padded
//! with [`Tile::Void`].

use std::fmt;
use std::io;
use std::path::{Path as FsPath, PathBuf};

use fuelgrid_core::Point;

use crate::edit::Editor;
use crate::map::GridMap;
use crate::tile::Tile;

/// Widest map a level may describe.
pub const MAX_WIDTH: i32 = 20;
/// Tallest map a level may describe.
pub const MAX_HEIGHT: i32 = 15;

/// `<dir>/level<n>.txt`.
pub fn level_path(dir: impl AsRef<FsPath>, n: u32) -> PathBuf {
    dir.as_ref().join(format!("level{n}.txt"))
}

/// A parsed level: the initial map plus the player's editing budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    map: GridMap,
    break_limit: u32,
    max_stations: u32,
}

impl Level {
    /// Parse level text.
    pub fn parse(s: &str) -> Result<Self, LevelError> {
        let mut lines = s.lines().map(str::trim).filter(|l| !l.is_empty());

        let header = lines.next().ok_or(LevelError::MissingHeader)?;
        let (fuel_capacity, break_limit, max_stations) = parse_header(header)?;

        let rows: Vec<&str> = lines.collect();
        if rows.is_empty() {
            return Err(LevelError::Empty);
        }
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        if width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(LevelError::TooLarge { width, height });
        }

        let mut start = None;
        let mut goal = None;
        let mut stations = Vec::new();
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for (y, row) in rows.iter().enumerate() {
            let mut n = 0;
            for (x, ch) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let tile = match ch {
                    '.' => Tile::Floor,
                    'X' => Tile::Wall,
                    'F' => {
                        stations.push(pos);
                        Tile::Floor
                    }
                    'S' => {
                        if start.replace(pos).is_some() {
                            return Err(LevelError::DuplicateStart { pos });
                        }
                        Tile::Start
                    }
                    'G' => {
                        if goal.replace(pos).is_some() {
                            return Err(LevelError::DuplicateGoal { pos });
                        }
                        Tile::Goal
                    }
                    _ => return Err(LevelError::InvalidTile { ch, pos }),
                };
                tiles.push((pos, tile));
                n += 1;
            }
            for x in n..width {
                tiles.push((Point::new(x, y as i32), Tile::Void));
            }
        }

        let start = start.ok_or(LevelError::MissingStart)?;
        let goal = goal.ok_or(LevelError::MissingGoal)?;

        let mut map = GridMap::new(width, height, fuel_capacity, start, goal);
        for (pos, tile) in tiles {
            map.set_tile(pos, tile);
        }
        for pos in stations {
            map.add_fuel_station(pos);
        }

        Ok(Self {
            map,
            break_limit,
            max_stations,
        })
    }

    /// Read and parse a level file.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::parse(&text)?;
        log::info!(
            "loaded {} ({}x{}, fuel {}, breaks {}, stations {})",
            path.display(),
            level.map.width(),
            level.map.height(),
            level.map.fuel_capacity(),
            level.break_limit,
            level.max_stations
        );
        Ok(level)
    }

    /// The map as the level describes it, before any edits.
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// How many walls the player may break.
    pub fn break_limit(&self) -> u32 {
        self.break_limit
    }

    /// How many fuel stations the player may place.
    pub fn max_stations(&self) -> u32 {
        self.max_stations
    }

    /// A fresh editor over a copy of the initial map with full budgets.
    pub fn editor(&self) -> Editor {
        Editor::new(self.map.clone(), self.break_limit, self.max_stations)
    }
}

fn parse_header(line: &str) -> Result<(u32, u32, u32), LevelError> {
    let bad = || LevelError::BadHeader {
        line: line.to_string(),
    };
    let nums = line
        .split(',')
        .map(|f| f.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| bad())?;
    match nums[..] {
        [fuel, breaks, stations] => Ok((fuel, breaks, stations)),
        _ => Err(bad()),
    }
}

/// Errors that can occur when reading a level.
#[derive(Debug)]
pub enum LevelError {
    /// The file has no lines at all.
    MissingHeader,
    /// The first line is not `fuel,breaks,stations`.
    BadHeader { line: String },
    /// No map rows follow the header.
    Empty,
    /// A character outside `.XSGF`.
    InvalidTile { ch: char, pos: Point },
    MissingStart,
    MissingGoal,
    /// A second `S`.
    DuplicateStart { pos: Point },
    /// A second `G`.
    DuplicateGoal { pos: Point },
    /// The map exceeds [`MAX_WIDTH`] × [`MAX_HEIGHT`].
    TooLarge { width: i32, height: i32 },
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl LevelError {
    /// Whether the error means the level file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => f.write_str("level: missing header line"),
            Self::BadHeader { line } => write!(
                f,
                "level: header must be \u{201c}fuel,breaks,stations\u{201d}, got \u{201c}{line}\u{201d}"
            ),
            Self::Empty => f.write_str("level: no map rows"),
            Self::InvalidTile { ch, pos } => {
                write!(f, "level: invalid tile \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::MissingStart => f.write_str("level: no start (S)"),
            Self::MissingGoal => f.write_str("level: no goal (G)"),
            Self::DuplicateStart { pos } => write!(f, "level: second start (S) at {pos}"),
            Self::DuplicateGoal { pos } => write!(f, "level: second goal (G) at {pos}"),
            Self::TooLarge { width, height } => write!(
                f,
                "level: map is {width}x{height}, limit is {MAX_WIDTH}x{MAX_HEIGHT}"
            ),
            Self::Io { path, source } => write!(f, "level: {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn level_round_trip() {
        let level = Level::parse("4,1,2\nS.F\nX.G").unwrap();
        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }
}
