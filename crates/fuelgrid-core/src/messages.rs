//! Input events: [`Msg`], [`Key`], [`MouseAction`].

use std::time::Instant;

use crate::geom::Point;

/// A keyboard key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    /// Any character key, as typed.
    Char(char),
}

/// A mouse action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    /// Left button down.
    Main,
    /// Right button down.
    Secondary,
    /// Button released.
    Release,
    /// Pointer motion, with or without a held button.
    Move,
}

/// Everything a [`Model`](crate::Model) can be told.
#[derive(Clone, Debug)]
pub enum Msg {
    /// A key was pressed.
    KeyDown { key: Key, time: Instant },
    /// A mouse event at a screen cell.
    Mouse {
        action: MouseAction,
        pos: Point,
        time: Instant,
    },
    /// The terminal was resized.
    Screen {
        width: i32,
        height: i32,
        time: Instant,
    },
    /// Periodic clock tick emitted by the app loop.
    Tick { time: Instant },
    /// First message of every run.
    Init,
    /// Request to quit.
    Quit,
}

impl Msg {
    /// Convenience: a `KeyDown` stamped now.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            time: Instant::now(),
        }
    }

    /// Convenience: a primary-button press at `pos`, stamped now.
    pub fn click(pos: Point) -> Self {
        Self::Mouse {
            action: MouseAction::Main,
            pos,
            time: Instant::now(),
        }
    }

    /// The timestamp carried by the message, if any.
    pub fn time(&self) -> Option<Instant> {
        match self {
            Self::KeyDown { time, .. }
            | Self::Mouse { time, .. }
            | Self::Screen { time, .. }
            | Self::Tick { time } => Some(*time),
            Self::Init | Self::Quit => None,
        }
    }
}
