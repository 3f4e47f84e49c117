//! Rendering: the map on the left, banners under it, the side panel on the
//! right.

use fuelgrid_core::{AttrMask, Cell, Color, Grid, Point, Style};
use fuelgrid_level::{MAX_WIDTH, Tile};

use crate::model::{BLINK, Phase, PuzzleModel};

// -- Palette --

pub const FLOOR_FG: Color = Color::rgb(110, 115, 125);
pub const WALL_FG: Color = Color::rgb(150, 155, 170);
pub const WALL_BG: Color = Color::rgb(50, 50, 50);
pub const START_FG: Color = Color::rgb(100, 150, 255);
pub const GOAL_FG: Color = Color::rgb(80, 200, 80);
pub const FUEL_FG: Color = Color::rgb(255, 220, 60);
pub const ROUTE_FG: Color = Color::rgb(100, 160, 180);
pub const CAR_FG: Color = Color::rgb(248, 248, 242);
pub const BLINK_FG: Color = Color::rgb(255, 165, 0);
pub const TEXT_FG: Color = Color::rgb(200, 200, 200);
pub const CLEAR_FG: Color = Color::rgb(255, 255, 0);
pub const FAIL_FG: Color = Color::rgb(255, 85, 85);

const CLEAR_BANNER: &str = "CLEAR!";
const FAIL_BANNER: &str = "No route! Press R to retry";
const DONE_BANNER: &str = "All levels cleared!";

/// Widest banner; banners are ASCII.
const BANNER_WIDTH: i32 = FAIL_BANNER.len() as i32;

/// First column of the side panel, clear of both the map and the banners.
pub const PANEL_X: i32 = if MAX_WIDTH > BANNER_WIDTH {
    MAX_WIDTH
} else {
    BANNER_WIDTH
} + 2;

const RULES: [&str; 6] = [
    "Rules",
    "- click floor: fuel station",
    "- click wall: break it",
    "- Enter: find a route",
    "- R: retry   Q: quit",
    "- F: station  #: wall",
];

/// Flashes per blink.
const BLINK_PHASES: u32 = 3;

impl PuzzleModel {
    pub(crate) fn draw_map(&self, grid: &mut Grid) {
        let map = self.editor.map();
        let route = self.route();
        for p in map.bounds().iter() {
            let Some(tile) = map.tile(p) else { continue };
            let station = map.is_fuel_station(p);
            let (ch, style) = match tile {
                Tile::Void => continue,
                Tile::Wall => ('#', Style::PLAIN.with_fg(WALL_FG).with_bg(WALL_BG)),
                Tile::Start => ('S', bold(START_FG)),
                Tile::Goal => ('G', bold(GOAL_FG)),
                Tile::Floor if station => ('F', bold(FUEL_FG)),
                Tile::Floor if route.is_some_and(|(r, _)| r.contains(p)) => {
                    ('*', Style::PLAIN.with_fg(ROUTE_FG))
                }
                Tile::Floor => ('.', Style::PLAIN.with_fg(FLOOR_FG)),
            };
            grid.set(p, Cell::new(ch).with_style(style));
        }

        if let Some(p) = self.blinking() {
            let style = Style::PLAIN
                .with_fg(BLINK_FG)
                .with_attrs(AttrMask::REVERSE);
            grid.set(p, Cell::new('#').with_style(style));
        }

        if let Some(p) = route.and_then(|(r, step)| r.cells().get(step).copied()) {
            grid.set(p, Cell::new('@').with_style(bold(CAR_FG)));
        }
    }

    /// The broken wall cell, if it is in the "on" half of a flash.
    fn blinking(&self) -> Option<Point> {
        let (p, at) = self.blink?;
        let elapsed = self.now?.saturating_duration_since(at);
        if elapsed >= BLINK {
            return None;
        }
        let flash = BLINK / (2 * BLINK_PHASES);
        let half = elapsed.as_millis() / flash.as_millis().max(1);
        (half % 2 == 0).then_some(p)
    }

    pub(crate) fn draw_banner(&self, grid: &mut Grid) {
        let (text, fg) = match self.phase {
            Phase::Driving { .. } | Phase::Cleared { .. } => (CLEAR_BANNER, CLEAR_FG),
            Phase::Failed => (FAIL_BANNER, FAIL_FG),
            Phase::Finished => (DONE_BANNER, CLEAR_FG),
            Phase::Editing => return,
        };
        let map = self.editor.map();
        let len = text.chars().count() as i32;
        let x = ((map.width() - len) / 2).max(0);
        grid.draw_text(Point::new(x, map.height() + 1), text, bold(fg));
    }

    pub(crate) fn draw_panel(&self, grid: &mut Grid) {
        let text = Style::PLAIN.with_fg(TEXT_FG);
        let mut y = 0;
        for (i, line) in RULES.iter().enumerate() {
            let style = if i == 0 { bold(TEXT_FG) } else { text };
            grid.draw_text(Point::new(PANEL_X, y), line, style);
            y += 1;
        }
        y += 1;

        let map = self.editor.map();
        let mut lines = vec![
            format!("Level {}", self.number),
            format!("Start fuel: {}", map.fuel_capacity()),
            format!("Stations left: {}", self.editor.stations_left()),
            format!("Breaks left: {}", self.editor.breaks_left()),
        ];
        if let Some(fuel) = self.current_fuel() {
            lines.push(format!("Fuel: {fuel}"));
        }
        for line in &lines {
            grid.draw_text(Point::new(PANEL_X, y), line, text);
            y += 1;
        }

        y += 1;
        let dim = text.with_attrs(AttrMask::DIM);
        for line in wrap(&self.message, (grid.width() - PANEL_X) as usize) {
            grid.draw_text(Point::new(PANEL_X, y), &line, dim);
            y += 1;
        }
    }
}

/// Greedy word wrap. Words longer than `width` are left to be clipped.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn bold(fg: Color) -> Style {
    Style::PLAIN.with_fg(fg).with_attrs(AttrMask::BOLD)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use fuelgrid_core::{Key, Model, MouseAction, Msg};
    use fuelgrid_level::Level;

    use crate::model::{PuzzleConfig, UI_HEIGHT, UI_WIDTH};

    use super::*;

    fn model(text: &str) -> PuzzleModel {
        PuzzleModel::with_level(PuzzleConfig::default(), 1, Level::parse(text).unwrap())
    }

    fn render(m: &PuzzleModel) -> Grid {
        let mut grid = Grid::new(UI_WIDTH, UI_HEIGHT);
        m.draw(&mut grid);
        grid
    }

    fn row(grid: &Grid, y: i32, from: i32, to: i32) -> String {
        (from..to).map(|x| grid.at(Point::new(x, y)).ch).collect()
    }

    fn panel_has(grid: &Grid, needle: &str) -> bool {
        (0..UI_HEIGHT).any(|y| row(grid, y, PANEL_X, UI_WIDTH).contains(needle))
    }

    #[test]
    fn wrap_breaks_on_spaces() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 7), Vec::<String>::new());
        assert_eq!(wrap("abcdefghij", 4), vec!["abcdefghij"]);
    }

    #[test]
    fn map_and_panel() {
        let m = model("4,1,2\nS.X\nF.G\n");
        let grid = render(&m);
        assert_eq!(row(&grid, 0, 0, 3), "S.#");
        assert_eq!(row(&grid, 1, 0, 3), "F.G");
        assert_eq!(grid.at(Point::new(2, 0)).style.fg, WALL_FG);
        assert!(panel_has(&grid, "Start fuel: 4"));
        assert!(panel_has(&grid, "Stations left: 2"));
        assert!(panel_has(&grid, "Breaks left: 1"));
        assert!(!panel_has(&grid, "Fuel:"));
    }

    #[test]
    fn void_cells_stay_blank() {
        let m = model("4,0,0\nS..\nG\n");
        let grid = render(&m);
        assert_eq!(row(&grid, 1, 0, 3), "G  ");
    }

    #[test]
    fn failure_banner_under_the_map() {
        let mut m = model("1,0,0\nS.G\n");
        m.update(Msg::key(Key::Enter));
        let grid = render(&m);
        assert_eq!(row(&grid, 2, 0, 26), "No route! Press R to retry");
    }

    #[test]
    fn banners_fit_left_of_the_panel() {
        for banner in [CLEAR_BANNER, FAIL_BANNER, DONE_BANNER] {
            assert!(banner.chars().count() as i32 + 2 <= PANEL_X, "{banner}");
        }

        // A full-width map still leaves the banner row whole.
        let mut m = model("1,0,0\nS..................G\n");
        m.update(Msg::key(Key::Enter));
        let grid = render(&m);
        assert!(m.is_failed());
        assert_eq!(row(&grid, 2, 0, PANEL_X), "No route! Press R to retry  ");
        assert_eq!(row(&grid, 2, PANEL_X, PANEL_X + 22), "- click wall: break it");
    }

    #[test]
    fn route_and_car_while_driving() {
        let mut m = model("5,0,0\nS...G\n");
        let t0 = Instant::now();
        m.update(Msg::KeyDown {
            key: Key::Enter,
            time: t0,
        });
        m.update(Msg::Tick {
            time: t0 + Duration::from_millis(150),
        });
        let grid = render(&m);
        assert_eq!(row(&grid, 0, 0, 5), "S@**G");
        assert!(row(&grid, 2, 0, 5).contains("CLEAR"));
        assert!(panel_has(&grid, "Fuel: 4"));
    }

    #[test]
    fn broken_wall_flashes() {
        let mut m = model("5,1,0\nSX.G\n");
        let t0 = Instant::now();
        m.update(Msg::Mouse {
            action: MouseAction::Main,
            pos: Point::new(1, 0),
            time: t0,
        });
        let grid = render(&m);
        assert!(grid.at(Point::new(1, 0)).style.attrs.contains(AttrMask::REVERSE));

        m.update(Msg::Tick {
            time: t0 + Duration::from_millis(50),
        });
        assert_eq!(render(&m).at(Point::new(1, 0)).ch, '.');

        m.update(Msg::Tick {
            time: t0 + Duration::from_millis(400),
        });
        let grid = render(&m);
        assert_eq!(grid.at(Point::new(1, 0)).ch, '.');
        assert!(panel_has(&grid, "Breaks left: 0"));
    }
}
