//! Best-first search over (cell, remaining fuel) states.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use fuelgrid_core::Point;

use crate::distance::manhattan;
use crate::neighbors::cardinal;
use crate::path::Path;
use crate::traits::FuelMap;

// ---------------------------------------------------------------------------
// Public result types
// ---------------------------------------------------------------------------

/// Resource bounds for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// Abort once this many states have been expanded. `None` is unbounded.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// No bound on the number of expansions.
    pub const UNBOUNDED: Self = Self {
        max_expansions: None,
    };

    pub const fn with_max_expansions(max: usize) -> Self {
        Self {
            max_expansions: Some(max),
        }
    }
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// States popped and expanded.
    pub expanded: usize,
    /// States pushed onto the frontier, the start state included.
    pub pushed: usize,
    /// States popped but skipped because the cell was already expanded with
    /// at least as much fuel.
    pub dominated: usize,
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A minimum-step route was found.
    Found(Path),
    /// The frontier emptied: no fuel-feasible route exists.
    NotFound,
    /// The expansion limit was hit before the search could decide.
    Exhausted { limit: usize },
}

/// Outcome plus counters of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// A search stopped by its [`SearchLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    ExpansionLimit { limit: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpansionLimit { limit } => {
                write!(f, "search aborted after expanding {limit} states")
            }
        }
    }
}

impl std::error::Error for SearchError {}

// ---------------------------------------------------------------------------
// Internal frontier and arena
// ---------------------------------------------------------------------------

/// Arena record: one pushed state, linked to the state it was reached from.
struct Node {
    pos: Point,
    parent: usize,
}

const ROOT: usize = usize::MAX;

/// Frontier entry. Ordered on `(f, g, x, y, fuel)` ascending; the arena index
/// only keeps the order total.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Entry {
    f: u32,
    g: u32,
    pos: Point,
    fuel: u32,
    node: usize,
}

impl Entry {
    #[inline]
    fn key(&self) -> (u32, u32, i32, i32, u32) {
        (self.f, self.g, self.pos.x, self.pos.y, self.fuel)
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key first.
        other
            .key()
            .cmp(&self.key())
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn push(&mut self, pos: Point, parent: usize) -> usize {
        self.nodes.push(Node { pos, parent });
        self.nodes.len() - 1
    }

    /// Lexicographic comparison of the routes ending at `a` and `b`, which
    /// must have the same length. Cells compare by `x`, then `y`.
    fn cmp_routes(&self, mut a: usize, mut b: usize) -> Ordering {
        let mut ord = Ordering::Equal;
        // Walk towards the root; the last difference seen is the earliest.
        while a != b && a != ROOT && b != ROOT {
            let (pa, pb) = (self.nodes[a].pos, self.nodes[b].pos);
            let c = (pa.x, pa.y).cmp(&(pb.x, pb.y));
            if c != Ordering::Equal {
                ord = c;
            }
            a = self.nodes[a].parent;
            b = self.nodes[b].parent;
        }
        ord
    }

    fn route(&self, mut idx: usize) -> Path {
        let mut cells = Vec::new();
        while idx != ROOT {
            cells.push(self.nodes[idx].pos);
            idx = self.nodes[idx].parent;
        }
        cells.reverse();
        Path::new(cells)
    }
}

// ---------------------------------------------------------------------------
// FuelPathFinder
// ---------------------------------------------------------------------------

/// Minimum-step route search under a fuel budget.
///
/// Each move costs one unit of fuel; arriving on a fuel station resets the
/// tank to full capacity. The finder borrows the map and re-reads it on every
/// call, so edits made between calls are always seen. It keeps no state of
/// its own between calls.
pub struct FuelPathFinder<'a, M: FuelMap> {
    map: &'a M,
}

impl<'a, M: FuelMap> FuelPathFinder<'a, M> {
    pub fn new(map: &'a M) -> Self {
        Self { map }
    }

    /// The map this finder searches.
    pub fn map(&self) -> &'a M {
        self.map
    }

    /// Find a fuel-feasible route from start to goal with the fewest steps.
    ///
    /// Returns `None` when no such route exists. When several shortest
    /// routes exist the same one is returned every time.
    pub fn find_path(&self) -> Option<Path> {
        match self.search(&SearchLimits::UNBOUNDED).outcome {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound | SearchOutcome::Exhausted { .. } => None,
        }
    }

    /// Like [`find_path`](Self::find_path), but fails with
    /// [`SearchError::ExpansionLimit`] when `limits` stop the search early.
    pub fn find_path_with(&self, limits: &SearchLimits) -> Result<Option<Path>, SearchError> {
        match self.search(limits).outcome {
            SearchOutcome::Found(path) => Ok(Some(path)),
            SearchOutcome::NotFound => Ok(None),
            SearchOutcome::Exhausted { limit } => Err(SearchError::ExpansionLimit { limit }),
        }
    }

    /// Run the search and report how it ended along with its counters.
    pub fn search(&self, limits: &SearchLimits) -> SearchReport {
        let map = self.map;
        let start = map.start();
        let goal = map.goal();
        let capacity = map.fuel_capacity();

        let mut stats = SearchStats::default();
        let mut arena = Arena { nodes: Vec::new() };
        let mut open: BinaryHeap<Entry> = BinaryHeap::new();
        // Most fuel each cell has been expanded with.
        let mut best_fuel: HashMap<Point, u32> = HashMap::new();

        let root = arena.push(start, ROOT);
        open.push(Entry {
            f: manhattan(start, goal),
            g: 0,
            pos: start,
            fuel: capacity,
            node: root,
        });
        stats.pushed += 1;

        let outcome = 'search: loop {
            let Some(mut current) = open.pop() else {
                break 'search SearchOutcome::NotFound;
            };

            // Entries with an identical key are the same state reached by
            // different routes; keep the lexicographically smallest route.
            while let Some(&next) = open.peek() {
                if next.key() != current.key() {
                    break;
                }
                open.pop();
                stats.dominated += 1;
                if arena.cmp_routes(next.node, current.node) == Ordering::Less {
                    current = next;
                }
            }

            if current.pos == goal {
                break 'search SearchOutcome::Found(arena.route(current.node));
            }

            if best_fuel
                .get(&current.pos)
                .is_some_and(|&best| best >= current.fuel)
            {
                stats.dominated += 1;
                continue;
            }

            if let Some(limit) = limits.max_expansions {
                if stats.expanded >= limit {
                    break 'search SearchOutcome::Exhausted { limit };
                }
            }

            best_fuel.insert(current.pos, current.fuel);
            stats.expanded += 1;
            log::trace!(
                "expand {} g={} fuel={} f={}",
                current.pos,
                current.g,
                current.fuel,
                current.f
            );

            for np in cardinal(current.pos) {
                if !map.is_valid(np) {
                    continue;
                }
                let new_fuel = if map.is_fuel_station(np) {
                    capacity
                } else {
                    match current.fuel.checked_sub(1) {
                        Some(fuel) => fuel,
                        None => continue,
                    }
                };
                let g = current.g + 1;
                let node = arena.push(np, current.node);
                open.push(Entry {
                    f: g + manhattan(np, goal),
                    g,
                    pos: np,
                    fuel: new_fuel,
                    node,
                });
                stats.pushed += 1;
            }
        };

        match &outcome {
            SearchOutcome::Found(path) => log::debug!(
                "route {} -> {} in {} steps ({} expanded, {} pushed, {} dominated)",
                start,
                goal,
                path.steps(),
                stats.expanded,
                stats.pushed,
                stats.dominated
            ),
            SearchOutcome::NotFound => log::debug!(
                "no route {} -> {} with capacity {} ({} expanded)",
                start,
                goal,
                capacity,
                stats.expanded
            ),
            SearchOutcome::Exhausted { limit } => {
                log::warn!("search {start} -> {goal} stopped at expansion limit {limit}")
            }
        }

        SearchReport { outcome, stats }
    }
}
