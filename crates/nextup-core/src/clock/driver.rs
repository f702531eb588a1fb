//! Alert clock driver.
//!
//! Two timers run inside one task:
//!
//! ```text
//! fine   (tick, ~1s)     -> recompute board from held snapshot, publish, update audio
//! coarse (refresh, ~60s) -> spawn source.load(); result arrives over a channel
//!                           and replaces the snapshot wholesale
//! ```
//!
//! A slow or failing source never stalls the fine timer: loads run on their
//! own task and at most one is in flight. Cancelling the token stops both
//! timers, aborts a pending load and silences any looping sound.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::audio::{AlertAudio, SoundCue, SoundPlayer};
use super::{Clock, DisplaySink, LocalClock};
use crate::display::Board;
use crate::error::SourceError;
use crate::events::BoardEvent;
use crate::recurrence::Resolver;
use crate::source::{BoardData, ReminderSource};

const DEFAULT_TICK: Duration = Duration::from_secs(1);
const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

type LoadResult = Result<BoardData, SourceError>;

pub struct AlertClock<S, K, P>
where
    S: ReminderSource + 'static,
    K: DisplaySink,
    P: SoundPlayer,
{
    source: Arc<S>,
    sink: K,
    audio: AlertAudio<P>,
    clock: Box<dyn Clock>,
    resolver: Resolver,
    tick_every: Duration,
    refresh_every: Duration,
    /// Held snapshot; replaced, never mutated.
    data: Arc<BoardData>,
    /// False until the first load completes (either way).
    loaded: bool,
    last: Option<Board>,
}

impl<S, K, P> AlertClock<S, K, P>
where
    S: ReminderSource + 'static,
    K: DisplaySink,
    P: SoundPlayer,
{
    pub fn new(source: S, sink: K, audio: AlertAudio<P>) -> Self {
        Self {
            source: Arc::new(source),
            sink,
            audio,
            clock: Box::new(LocalClock),
            resolver: Resolver::default(),
            tick_every: DEFAULT_TICK,
            refresh_every: DEFAULT_REFRESH,
            data: Arc::new(BoardData::default()),
            loaded: false,
            last: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Override both periods. Zero durations are bumped to one millisecond.
    pub fn with_timing(mut self, tick: Duration, refresh: Duration) -> Self {
        self.tick_every = tick.max(Duration::from_millis(1));
        self.refresh_every = refresh.max(Duration::from_millis(1));
        self
    }

    /// Start from a known snapshot instead of waiting for the first load.
    pub fn with_data(mut self, data: BoardData) -> Self {
        self.data = Arc::new(data);
        self.loaded = true;
        self
    }

    /// The board published by the most recent tick.
    pub fn last_board(&self) -> Option<&Board> {
        self.last.as_ref()
    }

    /// Recompute and publish the board for the current instant.
    pub fn tick(&mut self) -> &Board {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Recompute and publish the board as of `now`.
    pub fn tick_at(&mut self, now: NaiveDateTime) -> &Board {
        let board = Board::compute(&self.data, now, &self.resolver);

        for event in BoardEvent::diff(self.last.as_ref(), &board) {
            debug!(?event, "board transition");
            self.sink.event(&event);
        }
        self.sink.publish(&board);
        self.audio.apply(&SoundCue::for_board(&board), now);

        self.last.insert(board)
    }

    /// Swap in a freshly loaded snapshot, or keep the old one on failure.
    pub fn apply_refresh(&mut self, result: LoadResult) {
        let at = self.clock.now();
        self.loaded = true;
        let event = match result {
            Ok(data) => {
                info!(reminders = data.reminders.len(), "board data refreshed");
                let event = BoardEvent::Refreshed {
                    reminders: data.reminders.len(),
                    at,
                };
                self.data = Arc::new(data);
                event
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping last snapshot");
                BoardEvent::RefreshFailed {
                    error: e.to_string(),
                    at,
                }
            }
        };
        self.sink.event(&event);
    }

    /// Drive the board until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let (tx, mut rx) = mpsc::channel::<LoadResult>(1);
        let mut pending: Option<JoinHandle<()>> = None;

        let mut fine = tokio::time::interval(self.tick_every);
        fine.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut coarse = tokio::time::interval(self.refresh_every);
        coarse.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            source = %self.source.describe(),
            tick_ms = self.tick_every.as_millis() as u64,
            refresh_secs = self.refresh_every.as_secs(),
            "alert clock started"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                Some(result) = rx.recv() => {
                    pending = None;
                    self.apply_refresh(result);
                    self.tick();
                }

                _ = coarse.tick() => {
                    if pending.as_ref().is_some_and(|h| !h.is_finished()) {
                        debug!("previous refresh still running, skipping");
                        continue;
                    }
                    let source = Arc::clone(&self.source);
                    let tx = tx.clone();
                    pending = Some(tokio::spawn(async move {
                        let result = source.load().await;
                        let _ = tx.send(result).await;
                    }));
                }

                _ = fine.tick() => {
                    if self.loaded {
                        self.tick();
                    }
                }
            }
        }

        if let Some(handle) = pending {
            handle.abort();
        }
        self.audio.shutdown();
        info!("alert clock stopped");
    }
}
