//! Elm-architecture Model for the puzzle.

use std::io;
use std::path::{Path as FsPath, PathBuf};
use std::time::{Duration, Instant};

use fuelgrid_core::{Effect, Grid, Key, Model, MouseAction, Msg, Point};
use fuelgrid_level::{Edit, Editor, Level, LevelError, level_path};
use fuelgrid_paths::{FuelPathFinder, Path};

pub const UI_WIDTH: i32 = 66;
pub const UI_HEIGHT: i32 = 18;

/// Default delay between two car moves.
pub const STEP_MS: u64 = 150;
/// Default time the "CLEAR!" banner stays up before the next level.
pub const CLEAR_HOLD_MS: u64 = 2000;
/// How long a broken wall blinks.
pub(crate) const BLINK: Duration = Duration::from_millis(250);

/// Levels compiled into the binary, played when no directory is given.
const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/level1.txt"),
    include_str!("../levels/level2.txt"),
    include_str!("../levels/level3.txt"),
];

/// Where levels come from and how fast things move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Directory holding `level<n>.txt` files. `None` plays the built-in
    /// levels.
    pub levels_dir: Option<PathBuf>,
    /// Level number to start at.
    pub first_level: u32,
    pub step: Duration,
    pub clear_hold: Duration,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            levels_dir: None,
            first_level: 1,
            step: Duration::from_millis(STEP_MS),
            clear_hold: Duration::from_millis(CLEAR_HOLD_MS),
        }
    }
}

/// What the player is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Breaking walls and placing stations.
    Editing,
    /// A route was found; the car is following it.
    Driving {
        path: Path,
        /// Fuel on arrival at each cell of `path`.
        fuel: Vec<u32>,
        step: usize,
        last_step: Instant,
    },
    /// The search found nothing. Only a reload helps.
    Failed,
    /// The car reached the goal at `since`.
    Cleared {
        path: Path,
        fuel: Vec<u32>,
        since: Instant,
    },
    /// No more levels, or the next one could not be read.
    Finished,
}

/// The puzzle game model.
pub struct PuzzleModel {
    pub(crate) config: PuzzleConfig,
    pub(crate) number: u32,
    pub(crate) level: Level,
    pub(crate) editor: Editor,
    pub(crate) phase: Phase,
    pub(crate) message: String,
    /// Last broken wall and when it broke.
    pub(crate) blink: Option<(Point, Instant)>,
    /// Latest time seen on any message.
    pub(crate) now: Option<Instant>,
}

impl PuzzleModel {
    /// Load the first level named by `config`.
    pub fn new(config: PuzzleConfig) -> Result<Self, LevelError> {
        let number = config.first_level;
        let level = load_level(config.levels_dir.as_deref(), number)?;
        Ok(Self::with_level(config, number, level))
    }

    /// Start on an already parsed level.
    pub fn with_level(config: PuzzleConfig, number: u32, level: Level) -> Self {
        let editor = level.editor();
        Self {
            config,
            number,
            level,
            editor,
            phase: Phase::Editing,
            message: String::new(),
            blink: None,
            now: None,
        }
    }

    /// The level number being played.
    pub fn level_number(&self) -> u32 {
        self.number
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Last status line shown in the side panel.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the game has ended on its own.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Whether a route search has failed on the current map.
    pub fn is_failed(&self) -> bool {
        self.phase == Phase::Failed
    }

    /// Whether the car is on its way or has arrived.
    pub fn has_route(&self) -> bool {
        matches!(self.phase, Phase::Driving { .. } | Phase::Cleared { .. })
    }

    /// The route and car position while driving, or the whole route once
    /// cleared.
    pub(crate) fn route(&self) -> Option<(&Path, usize)> {
        match &self.phase {
            Phase::Driving { path, step, .. } => Some((path, *step)),
            Phase::Cleared { path, .. } => Some((path, path.len().saturating_sub(1))),
            _ => None,
        }
    }

    /// Fuel in the tank at the car's current cell.
    pub fn current_fuel(&self) -> Option<u32> {
        match &self.phase {
            Phase::Driving { fuel, step, .. } => fuel.get(*step).copied(),
            Phase::Cleared { fuel, .. } => fuel.last().copied(),
            _ => None,
        }
    }

    fn click(&mut self, pos: Point, time: Instant) {
        if self.phase != Phase::Editing || !self.editor.map().bounds().contains(pos) {
            return;
        }
        self.message = match self.editor.click(pos) {
            Ok(Edit::WallBroken(p)) => {
                self.blink = Some((p, time));
                format!("Wall at {p} broken")
            }
            Ok(Edit::StationPlaced(p)) => format!("Fuel station placed at {p}"),
            Err(e) => format!("Cannot edit: {e}"),
        };
    }

    fn search(&mut self, time: Instant) {
        if self.phase != Phase::Editing {
            return;
        }
        let map = self.editor.map();
        match FuelPathFinder::new(map).find_path() {
            Some(path) => {
                let fuel = path.replay(map).unwrap_or_else(|e| {
                    log::warn!("found route does not replay: {e}");
                    Vec::new()
                });
                log::info!("level {}: route of {} steps", self.number, path.steps());
                self.message = format!("Route found: {} steps", path.steps());
                self.phase = Phase::Driving {
                    path,
                    fuel,
                    step: 0,
                    last_step: time,
                };
            }
            None => {
                log::info!("level {}: no route", self.number);
                self.message = "The car cannot reach the goal".to_string();
                self.phase = Phase::Failed;
            }
        }
    }

    fn reload(&mut self) {
        if self.phase == Phase::Finished {
            return;
        }
        self.editor = self.level.editor();
        self.phase = Phase::Editing;
        self.blink = None;
        self.message = format!("Level {} reset", self.number);
        log::debug!("level {} reset", self.number);
    }

    fn tick(&mut self, time: Instant) -> Option<Effect> {
        if self.blink.is_some_and(|(_, at)| time.duration_since(at) >= BLINK) {
            self.blink = None;
        }
        match &mut self.phase {
            Phase::Driving {
                path,
                fuel,
                step,
                last_step,
            } => {
                if time.duration_since(*last_step) >= self.config.step {
                    *step += 1;
                    *last_step = time;
                }
                if *step + 1 >= path.len() {
                    self.phase = Phase::Cleared {
                        path: std::mem::take(path),
                        fuel: std::mem::take(fuel),
                        since: time,
                    };
                }
                None
            }
            Phase::Cleared { since, .. } => {
                if time.duration_since(*since) >= self.config.clear_hold {
                    self.next_level()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn next_level(&mut self) -> Option<Effect> {
        let number = self.number + 1;
        match load_level(self.config.levels_dir.as_deref(), number) {
            Ok(level) => {
                self.editor = level.editor();
                self.level = level;
                self.number = number;
                self.phase = Phase::Editing;
                self.blink = None;
                self.message = format!("Level {number}");
                None
            }
            Err(e) if e.is_not_found() => {
                log::info!("all {} levels cleared", self.number);
                self.message = "All levels cleared!".to_string();
                self.phase = Phase::Finished;
                Some(Effect::End)
            }
            Err(e) => {
                log::error!("{e}");
                self.message = e.to_string();
                self.phase = Phase::Finished;
                Some(Effect::End)
            }
        }
    }
}

/// Level `number` from `dir`, or from the built-in set. A level past the
/// end of the built-in set is reported as a missing file.
fn load_level(dir: Option<&FsPath>, number: u32) -> Result<Level, LevelError> {
    if let Some(dir) = dir {
        return Level::load(level_path(dir, number));
    }
    let text = number
        .checked_sub(1)
        .and_then(|i| BUILTIN_LEVELS.get(i as usize))
        .ok_or_else(|| LevelError::Io {
            path: level_path("levels", number),
            source: io::ErrorKind::NotFound.into(),
        })?;
    let level = Level::parse(text)?;
    log::info!("loaded built-in level {number}");
    Ok(level)
}

impl Model for PuzzleModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        if let Some(time) = msg.time() {
            self.now = Some(time);
        }
        match msg {
            Msg::Init => {
                self.message = format!("Level {}", self.number);
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::KeyDown { key, time } => match key {
                Key::Escape | Key::Char('q' | 'Q') => Some(Effect::End),
                Key::Enter => {
                    self.search(time);
                    None
                }
                Key::Char('r' | 'R') => {
                    self.reload();
                    None
                }
                _ => None,
            },
            Msg::Mouse {
                action: MouseAction::Main,
                pos,
                time,
            } => {
                self.click(pos, time);
                None
            }
            Msg::Tick { time } => self.tick(time),
            _ => None,
        }
    }

    fn draw(&self, grid: &mut Grid) {
        self.draw_map(grid);
        self.draw_banner(grid);
        self.draw_panel(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelgrid_level::Tile;
    use std::fs;

    const OPEN: &str = "3,1,1\nS.X..G\n";

    fn model(text: &str) -> PuzzleModel {
        PuzzleModel::with_level(PuzzleConfig::default(), 1, Level::parse(text).unwrap())
    }

    fn tick(m: &mut PuzzleModel, t0: Instant, ms: u64) -> Option<Effect> {
        m.update(Msg::Tick {
            time: t0 + Duration::from_millis(ms),
        })
    }

    fn enter(m: &mut PuzzleModel, time: Instant) {
        m.update(Msg::KeyDown {
            key: Key::Enter,
            time,
        });
    }

    /// A fresh directory under the system temp dir.
    fn level_dir(name: &str, levels: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fuel-puzzle-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for (i, text) in levels.iter().enumerate() {
            fs::write(level_path(&dir, i as u32 + 1), text).unwrap();
        }
        dir
    }

    #[test]
    fn clicks_edit_the_map() {
        let mut m = model(OPEN);
        m.update(Msg::click(Point::new(2, 0)));
        assert_eq!(m.editor().map().tile(Point::new(2, 0)), Some(Tile::Floor));
        assert!(m.blink.is_some());
        m.update(Msg::click(Point::new(3, 0)));
        assert!(m.editor().map().is_fuel_station(Point::new(3, 0)));
        m.update(Msg::click(Point::new(4, 0)));
        assert!(m.message().contains("no fuel stations left"));
    }

    #[test]
    fn clicks_outside_the_map_are_ignored() {
        let mut m = model(OPEN);
        m.update(Msg::click(Point::new(30, 3)));
        assert_eq!(m.message(), "");
        assert_eq!(m.editor().breaks_left(), 1);
    }

    #[test]
    fn failed_search_locks_edits_until_reload() {
        let mut m = model(OPEN);
        enter(&mut m, Instant::now());
        assert!(m.is_failed());
        m.update(Msg::click(Point::new(2, 0)));
        assert_eq!(m.editor().map().tile(Point::new(2, 0)), Some(Tile::Wall));

        m.update(Msg::key(Key::Char('r')));
        assert!(!m.is_failed());
        m.update(Msg::click(Point::new(2, 0)));
        assert_eq!(m.editor().map().tile(Point::new(2, 0)), Some(Tile::Floor));
    }

    #[test]
    fn reload_restores_budgets_and_map() {
        let mut m = model(OPEN);
        m.update(Msg::click(Point::new(2, 0)));
        m.update(Msg::click(Point::new(3, 0)));
        m.update(Msg::key(Key::Char('r')));
        assert_eq!(m.editor().breaks_left(), 1);
        assert_eq!(m.editor().stations_left(), 1);
        assert_eq!(m.editor().map(), m.level.map());
    }

    #[test]
    fn enter_searches_once() {
        let mut m = model(OPEN);
        let t0 = Instant::now();
        m.update(Msg::click(Point::new(2, 0)));
        m.update(Msg::click(Point::new(3, 0)));
        enter(&mut m, t0);
        assert!(m.has_route());
        assert_eq!(m.current_fuel(), Some(3));

        // A second Enter does not restart the drive.
        tick(&mut m, t0, 150);
        enter(&mut m, t0 + Duration::from_millis(160));
        assert_eq!(m.route().map(|(_, step)| step), Some(1));
    }

    #[test]
    fn car_advances_every_step_and_refuels() {
        let mut m = model(OPEN);
        let t0 = Instant::now();
        m.update(Msg::click(Point::new(2, 0)));
        m.update(Msg::click(Point::new(3, 0)));
        enter(&mut m, t0);

        tick(&mut m, t0, 100);
        assert_eq!(m.route().map(|(_, s)| s), Some(0));
        tick(&mut m, t0, 150);
        assert_eq!(m.current_fuel(), Some(2));
        tick(&mut m, t0, 300);
        tick(&mut m, t0, 450);
        // Arrived at the station on (3, 0).
        assert_eq!(m.current_fuel(), Some(3));
        tick(&mut m, t0, 600);
        tick(&mut m, t0, 750);
        assert!(matches!(m.phase, Phase::Cleared { .. }));
        assert_eq!(m.current_fuel(), Some(1));
    }

    #[test]
    fn cleared_level_loads_the_next_one() {
        let dir = level_dir("next", &["2,0,0\nS.G\n", "2,0,0\nS..G\n"]);
        let mut m = PuzzleModel::new(PuzzleConfig {
            levels_dir: Some(dir.clone()),
            ..PuzzleConfig::default()
        })
        .unwrap();
        let t0 = Instant::now();
        enter(&mut m, t0);
        tick(&mut m, t0, 150);
        tick(&mut m, t0, 300);
        assert!(matches!(m.phase, Phase::Cleared { .. }));
        assert_eq!(tick(&mut m, t0, 1000), None);
        assert_eq!(m.level_number(), 1);
        assert_eq!(tick(&mut m, t0, 2300), None);
        assert_eq!(m.level_number(), 2);
        assert_eq!(m.editor().map().width(), 4);
        assert!(!m.has_route());

        // Level 2 needs three steps on two units of fuel.
        enter(&mut m, t0 + Duration::from_millis(2400));
        assert!(m.is_failed());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn last_level_ends_the_game() {
        let dir = level_dir("last", &["1,0,0\nSG\n"]);
        let mut m = PuzzleModel::new(PuzzleConfig {
            levels_dir: Some(dir.clone()),
            ..PuzzleConfig::default()
        })
        .unwrap();
        let t0 = Instant::now();
        enter(&mut m, t0);
        tick(&mut m, t0, 150);
        assert!(matches!(m.phase, Phase::Cleared { .. }));
        assert_eq!(tick(&mut m, t0, 2200), Some(Effect::End));
        assert!(m.is_finished());
        assert_eq!(m.message(), "All levels cleared!");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_first_level_is_an_error() {
        let dir = level_dir("missing", &[]);
        let err = PuzzleModel::new(PuzzleConfig {
            levels_dir: Some(dir.clone()),
            first_level: 7,
            ..PuzzleConfig::default()
        })
        .err()
        .unwrap();
        assert!(err.is_not_found());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn builtin_levels_without_a_directory() {
        let m = PuzzleModel::new(PuzzleConfig::default()).unwrap();
        let first = Level::parse(include_str!("../levels/level1.txt")).unwrap();
        assert_eq!(m.editor().map(), first.map());

        let m = PuzzleModel::new(PuzzleConfig {
            first_level: 3,
            ..PuzzleConfig::default()
        })
        .unwrap();
        assert_eq!(m.level_number(), 3);

        for first_level in [0, 4] {
            let err = PuzzleModel::new(PuzzleConfig {
                first_level,
                ..PuzzleConfig::default()
            })
            .err()
            .unwrap();
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn blink_fades() {
        let mut m = model(OPEN);
        let t0 = Instant::now();
        m.update(Msg::Mouse {
            action: MouseAction::Main,
            pos: Point::new(2, 0),
            time: t0,
        });
        tick(&mut m, t0, 100);
        assert!(m.blink.is_some());
        tick(&mut m, t0, 300);
        assert!(m.blink.is_none());
    }

    #[test]
    fn quit_keys_end() {
        let mut m = model(OPEN);
        assert_eq!(m.update(Msg::key(Key::Char('q'))), Some(Effect::End));
        assert_eq!(m.update(Msg::key(Key::Escape)), Some(Effect::End));
        assert_eq!(m.update(Msg::Quit), Some(Effect::End));
        assert_eq!(m.update(Msg::key(Key::Char('x'))), None);
    }
}
