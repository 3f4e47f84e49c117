//! Crossterm terminal driver for fuelgrid.
//!
//! Provides a [`CrosstermDriver`] that implements [`fuelgrid_core::Driver`],
//! painting diff frames to the terminal and translating key presses and
//! mouse clicks into [`Msg`]s.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind},
    execute, queue,
    style::{
        self, Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{self, ClearType},
};

use fuelgrid_core::{AttrMask, Color, Driver, Frame, Key, MouseAction, Msg, Point};

/// How long one poll waits for input before handing control back.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

const ATTRIBUTES: [(AttrMask, Attribute); 3] = [
    (AttrMask::BOLD, Attribute::Bold),
    (AttrMask::REVERSE, Attribute::Reverse),
    (AttrMask::DIM, Attribute::Dim),
];

/// Maps a [`Color`] to a crossterm colour.
fn to_ct_color(c: Color) -> CtColor {
    match c {
        Color::Default => CtColor::Reset,
        Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
    }
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Translates one terminal event, or `None` for events the game ignores.
fn to_msg(ev: Event) -> Option<Msg> {
    let time = Instant::now();
    match ev {
        // Windows also reports releases; only presses count.
        Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
            to_key(code).map(|key| Msg::KeyDown { key, time })
        }
        Event::Mouse(me) => {
            let pos = Point::new(me.column as i32, me.row as i32);
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Up(_) => MouseAction::Release,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::Mouse { action, pos, time })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
            time,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm. Mouse capture is always on, since
/// clicks are how the map gets edited.
#[derive(Debug, Default)]
pub struct CrosstermDriver;

impl CrosstermDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableMouseCapture
        )?;
        if let Ok((w, h)) = terminal::size() {
            log::debug!("terminal {w}x{h}");
        }
        Ok(())
    }

    fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(POLL_TIMEOUT)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if let Some(msg) = to_msg(event::read()?) {
                tx.send(msg).ok();
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();

        for fc in &frame.cells {
            let (p, cell) = (fc.pos, &fc.cell);
            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            for (mask, attr) in ATTRIBUTES {
                if attrs.contains(mask) {
                    queue!(stdout, SetAttribute(attr))?;
                }
            }
            write!(stdout, "{}", cell.ch)?;
            if !attrs.is_empty() {
                queue!(stdout, SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("could not leave raw mode: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    #[test]
    fn default_colour_resets() {
        assert_eq!(to_ct_color(Color::Default), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::rgb(1, 2, 3)),
            CtColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }

    #[test]
    fn key_press_becomes_key_down() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(
            to_msg(ev),
            Some(Msg::KeyDown {
                key: Key::Enter,
                ..
            })
        ));
        let ev = Event::Key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE));
        assert!(to_msg(ev).is_none());
    }

    #[test]
    fn left_click_carries_cell_position() {
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        match to_msg(ev) {
            Some(Msg::Mouse { action, pos, .. }) => {
                assert_eq!(action, MouseAction::Main);
                assert_eq!(pos, Point::new(7, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
