//! The update/draw loop tying a [`Model`] to a [`Driver`].

use std::error::Error;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::cell::Cell;
use crate::grid::{Frame, Grid, compute_frame};
use crate::messages::Msg;

/// What a model asks the loop to do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Leave the loop.
    End,
}

/// Game state: reacts to messages and paints itself.
pub trait Model {
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Paint into `grid`, which has been blanked beforehand.
    fn draw(&self, grid: &mut Grid);
}

/// The screen and input device the loop runs on.
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Forward pending input to `tx`. Blocks for a few milliseconds at most.
    fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn Error>>;

    /// Paint the changed cells in `frame`.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>>;

    /// Restore the device. Called once, also after an error.
    fn close(&mut self);
}

pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Size of the draw grid in cells.
    pub width: i32,
    pub height: i32,
    /// Send [`Msg::Tick`] this often. `None` means never.
    pub tick: Option<Duration>,
}

pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    tick: Option<Duration>,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        let AppConfig {
            model,
            driver,
            width,
            height,
            tick,
        } = config;
        Self {
            model,
            driver,
            width,
            height,
            tick,
        }
    }

    /// The model, for inspecting the final state after [`run`](Self::run).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run until the model returns [`Effect::End`] or the driver fails.
    ///
    /// The model first receives [`Msg::Init`]. Every batch of messages is
    /// followed by one redraw, and only cells that differ from the previous
    /// frame reach the driver.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;
        let result = self.event_loop();
        self.driver.close();
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn Error>> {
        let (tx, rx) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut shown = Grid::new(self.width, self.height);
        let mut next = Grid::new(self.width, self.height);
        let mut last_tick = Instant::now();

        loop {
            if self.process_pending(&rx, &mut shown, &mut next)? {
                return Ok(());
            }

            self.driver.poll_msgs(&tx)?;

            if let Some(every) = self.tick {
                let now = Instant::now();
                if now.duration_since(last_tick) >= every {
                    last_tick = now;
                    tx.send(Msg::Tick { time: now }).ok();
                }
            }
        }
    }

    /// Feed queued messages to the model, then redraw if any arrived.
    /// `Ok(true)` means the model ended the loop.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        shown: &mut Grid,
        next: &mut Grid,
    ) -> Result<bool, Box<dyn Error>> {
        let mut dirty = false;
        for msg in rx.try_iter() {
            if matches!(msg, Msg::Screen { .. }) {
                // The terminal was cleared; everything must be repainted.
                *shown = Grid::new(0, 0);
            }
            if self.model.update(msg) == Some(Effect::End) {
                return Ok(true);
            }
            dirty = true;
        }
        if !dirty {
            return Ok(false);
        }

        next.fill(Cell::default());
        self.model.draw(next);
        let frame = compute_frame(shown, next);
        if !frame.cells.is_empty() {
            self.driver.flush(frame)?;
        }
        shown.clone_from(next);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::messages::Key;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Counter {
        keys: usize,
        ticks: usize,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::KeyDown {
                    key: Key::Char('q'),
                    ..
                } => Some(Effect::End),
                Msg::KeyDown { .. } => {
                    self.keys += 1;
                    None
                }
                Msg::Tick { .. } => {
                    self.ticks += 1;
                    None
                }
                _ => None,
            }
        }

        fn draw(&self, grid: &mut Grid) {
            let ch = char::from_digit(self.keys as u32 % 10, 10).unwrap_or('?');
            grid.set(Point::new(0, 0), Cell::new(ch));
        }
    }

    #[derive(Default)]
    struct Scripted {
        script: VecDeque<Msg>,
        frames: Vec<Frame>,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }

        fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn Error>> {
            if let Some(msg) = self.script.pop_front() {
                tx.send(msg).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>> {
            self.frames.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn run_until_end_and_flush_diffs() {
        let script = VecDeque::from(vec![
            Msg::key(Key::Char('a')),
            Msg::key(Key::Char('b')),
            Msg::key(Key::Char('q')),
        ]);
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver: Scripted {
                script,
                ..Default::default()
            },
            width: 2,
            height: 1,
            tick: None,
        });
        app.run().unwrap();

        assert_eq!(app.model().keys, 2);
        assert!(app.driver.closed);
        // Init draws '0', then '1', then '2': one changed cell each time.
        assert_eq!(app.driver.frames.len(), 3);
        assert!(app.driver.frames.iter().all(|f| f.cells.len() == 1));
        assert_eq!(app.driver.frames[2].cells[0].cell.ch, '2');
    }

    #[test]
    fn ticks_are_emitted_when_configured() {
        let mut script = VecDeque::new();
        for _ in 0..3 {
            script.push_back(Msg::Init);
        }
        script.push_back(Msg::key(Key::Char('q')));
        let mut app = App::new(AppConfig {
            model: Counter::default(),
            driver: Scripted {
                script,
                ..Default::default()
            },
            width: 1,
            height: 1,
            tick: Some(Duration::ZERO),
        });
        app.run().unwrap();
        assert!(app.model().ticks >= 3);
    }
}
