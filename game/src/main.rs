use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use fuel_puzzle::{PuzzleConfig, PuzzleModel, UI_HEIGHT, UI_WIDTH, parse_point, solve};
use fuelgrid_core::{App, AppConfig, Point};
use fuelgrid_crossterm::CrosstermDriver;
use fuelgrid_level::Level;
use fuelgrid_paths::SearchLimits;

/// Interval between clock ticks driving animations.
const TICK: Duration = Duration::from_millis(30);

#[derive(Parser, Debug)]
#[command(author, version, about = "Fuel-limited A* tile puzzle")]
struct Cli {
    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the levels in the terminal (the default).
    Play(PlayArgs),
    /// Search one level file and print the route.
    Solve {
        /// Level file to read.
        file: PathBuf,
        /// Break the wall at X,Y before searching.
        #[arg(long = "break", value_name = "X,Y", value_parser = parse_point)]
        walls: Vec<Point>,
        /// Place a fuel station at X,Y before searching.
        #[arg(long = "station", value_name = "X,Y", value_parser = parse_point)]
        stations: Vec<Point>,
        /// Give up after expanding this many states.
        #[arg(long)]
        max_expansions: Option<usize>,
    },
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    /// Directory holding level1.txt, level2.txt, ... (defaults to ./levels,
    /// then levels/ beside the binary, then the built-in levels)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Level to start at.
    #[arg(long)]
    level: Option<u32>,
    /// Milliseconds between car moves.
    #[arg(long)]
    step_ms: Option<u64>,
}

impl PlayArgs {
    fn config(self) -> PuzzleConfig {
        let defaults = PuzzleConfig::default();
        PuzzleConfig {
            levels_dir: self.levels.or_else(find_levels_dir),
            first_level: self.level.unwrap_or(defaults.first_level),
            step: self.step_ms.map_or(defaults.step, Duration::from_millis),
            ..defaults
        }
    }
}

/// `./levels` if present, else `levels/` beside the executable. `None`
/// falls back to the levels built into the binary.
fn find_levels_dir() -> Option<PathBuf> {
    let local = PathBuf::from("levels");
    if local.is_dir() {
        return Some(local);
    }
    let beside = std::env::current_exe().ok()?.parent()?.join("levels");
    beside.is_dir().then_some(beside)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Play(PlayArgs::default()));

    // The terminal is in raw mode while playing, so stderr stays quiet.
    let default_filter = match (&command, &cli.log_file) {
        (_, Some(_)) => "info",
        (Command::Play(_), None) => "off",
        (Command::Solve { .. }, None) => "warn",
    };
    init_logging(cli.log_file.as_deref(), default_filter)?;

    match command {
        Command::Play(args) => play(args.config()),
        Command::Solve {
            file,
            walls,
            stations,
            max_expansions,
        } => {
            let level = Level::load(&file)?;
            let limits =
                max_expansions.map_or(SearchLimits::UNBOUNDED, SearchLimits::with_max_expansions);
            print!("{}", solve(&level, &walls, &stations, &limits)?);
            Ok(())
        }
    }
}

fn play(config: PuzzleConfig) -> Result<(), Box<dyn Error>> {
    let model = PuzzleModel::new(config)?;
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width: UI_WIDTH,
        height: UI_HEIGHT,
        tick: Some(TICK),
    });
    app.run()?;

    let model = app.model();
    if model.is_finished() {
        println!("{}", model.message());
    }
    Ok(())
}

fn init_logging(file: Option<&Path>, default_filter: &str) -> Result<(), Box<dyn Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
