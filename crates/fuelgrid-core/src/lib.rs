//! Core types for the fuelgrid puzzle.
//!
//! Geometry primitives shared by the map and the pathfinder, styled cells and
//! a draw grid with frame diffing, input messages, and the Elm-architecture
//! application loop that drivers plug into.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::{Frame, FrameCell, Grid};
pub use messages::{Key, MouseAction, Msg};
pub use style::{AttrMask, Color, Style};
