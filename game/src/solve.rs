//! Headless solving: apply edits to a level, search once, print the result.

use std::fmt::{self, Write};

use fuelgrid_core::Point;
use fuelgrid_level::{EditError, GridMap, Level};
use fuelgrid_paths::{FuelPathFinder, Path, SearchLimits, SearchOutcome};

/// Parse `X,Y` into a [`Point`].
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Errors from [`solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// A requested edit breaks the level's rules.
    Edit(EditError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(e) => write!(f, "solve: {e}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Edit(e) => Some(e),
        }
    }
}

impl From<EditError> for SolveError {
    fn from(e: EditError) -> Self {
        Self::Edit(e)
    }
}

/// Break `walls`, place `stations`, search, and render a report: the map
/// with the route drawn in, then the step count and the fuel on arrival at
/// each cell. Edits are checked against the level's budgets.
pub fn solve(
    level: &Level,
    walls: &[Point],
    stations: &[Point],
    limits: &SearchLimits,
) -> Result<String, SolveError> {
    let mut editor = level.editor();
    for &p in walls {
        editor.break_wall(p)?;
    }
    for &p in stations {
        editor.place_station(p)?;
    }
    let map = editor.map();

    let report = FuelPathFinder::new(map).search(limits);
    let stats = report.stats;
    let mut out = String::new();
    match report.outcome {
        SearchOutcome::Found(path) => {
            out.push_str(&map.ascii(Some(&path)));
            out.push_str(&route_lines(map, &path));
        }
        SearchOutcome::NotFound => {
            out.push_str(&map.ascii(None));
            out.push_str("no route\n");
        }
        SearchOutcome::Exhausted { limit } => {
            out.push_str(&map.ascii(None));
            writeln!(out, "gave up after {limit} expansions").ok();
        }
    }
    log::debug!(
        "expanded {}, pushed {}, dominated {}",
        stats.expanded,
        stats.pushed,
        stats.dominated
    );
    Ok(out)
}

/// Step count, then the fuel profile if `path` replays on `map`.
fn route_lines(map: &GridMap, path: &Path) -> String {
    let mut out = format!("route: {} steps\n", path.steps());
    match path.replay(map) {
        Ok(fuel) => {
            let fuel: Vec<String> = fuel.iter().map(u32::to_string).collect();
            writeln!(out, "fuel: {}", fuel.join(" ")).ok();
        }
        Err(e) => log::warn!("route does not replay: {e}"),
    }
    out
}
