//! The alert clock: periodic re-evaluation of the board.
//!
//! The engine itself is pure. This module owns the only mutable state: the
//! currently held snapshot, the last published board, and the alert sound.

pub mod audio;
mod driver;

use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime};

use crate::display::Board;
use crate::events::BoardEvent;

pub use audio::{AlertAudio, BellPlayer, CueKey, SilentPlayer, SoundCue, SoundPlayer};
pub use driver::AlertClock;

/// Source of "now" in local civil time.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Where published boards go.
pub trait DisplaySink: Send {
    /// Called once per fine tick with the freshly computed board.
    fn publish(&mut self, board: &Board);

    /// Called for each transition, before the board that caused it.
    fn event(&mut self, _event: &BoardEvent) {}
}
