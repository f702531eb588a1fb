//! # nextup Core Library
//!
//! The engine behind a "next task" board: given a set of reminders and the
//! current local time, it works out what happens next, whether a warning is
//! due, and what to show. The `nextup` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Recurrence**: resolves a reminder to its next upcoming occurrence
//!   (one-time, daily, weekly, monthly), or none
//! - **Warning**: picks the tightest applicable warning rule and decides
//!   whether its flash window is open
//! - **Display**: ranks upcoming reminders into a hero card and a queue
//! - **Clock**: re-evaluates the board every tick, refreshes data from a
//!   source on a slower cadence, and drives the alert sound
//! - **Source**: read-only loaders (file, HTTP, memory) that normalize
//!   legacy reminder records at ingestion
//!
//! All times are local civil time (`NaiveDateTime`); minute differences are
//! truncated toward zero.
//!
//! ## Key Components
//!
//! - [`Resolver`]: occurrence resolution with a month-end policy
//! - [`Board`]: one ranked snapshot of the display
//! - [`AlertClock`]: the periodic driver
//! - [`Config`]: application configuration management

pub mod clock;
pub mod display;
pub mod error;
pub mod events;
pub mod recurrence;
pub mod reminder;
pub mod source;
pub mod storage;
pub mod time;
pub mod warning;

pub use clock::{
    AlertAudio, AlertClock, BellPlayer, Clock, DisplaySink, LocalClock, ManualClock, SilentPlayer,
    SoundCue, SoundPlayer,
};
pub use display::{rank, Board, DisplayEntry};
pub use error::{AudioError, ConfigError, CoreError, SourceError};
pub use events::BoardEvent;
pub use recurrence::{resolve, MonthEndPolicy, Recurrence, Resolver};
pub use reminder::{FlashMode, FlashSpeed, Reminder, Settings, Theme, WarningRule};
pub use source::{AnySource, BoardData, FileSource, HttpSource, MemorySource, ReminderSource};
pub use storage::Config;
pub use warning::{evaluate, flash_window_open, Evaluation};
