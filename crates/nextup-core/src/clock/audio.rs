//! Alert sound control.
//!
//! At most one sound loops at a time, keyed to the hero's active rule.
//! [`SoundCue::for_board`] derives what should be audible right now and
//! [`AlertAudio::apply`] reconciles the player with it on every tick.
//! Playback errors never reach the caller.

use chrono::{Duration, NaiveDateTime};

use crate::display::Board;
use crate::error::AudioError;

/// Identifies one sounding of one rule for one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CueKey {
    pub reminder_id: String,
    pub rule_minutes: u32,
    pub occurrence: NaiveDateTime,
}

/// What should be audible for the current board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCue {
    Silent,
    /// Play once per key.
    Once { key: CueKey, sound: String },
    /// Repeat while the flash window is open.
    Loop { key: CueKey, sound: String },
}

impl SoundCue {
    pub fn for_board(board: &Board) -> Self {
        let Some(entry) = board.top.as_ref() else {
            return SoundCue::Silent;
        };
        let Some(rule) = entry.active_rule.as_ref() else {
            return SoundCue::Silent;
        };
        let Some(sound) = rule.sound_url.clone() else {
            return SoundCue::Silent;
        };
        let key = CueKey {
            reminder_id: entry.reminder.id.clone(),
            rule_minutes: rule.minutes,
            occurrence: entry.occurrence,
        };

        if entry.flash_active {
            SoundCue::Loop { key, sound }
        } else if !rule.flash {
            SoundCue::Once { key, sound }
        } else {
            SoundCue::Silent
        }
    }

    fn key(&self) -> Option<&CueKey> {
        match self {
            SoundCue::Silent => None,
            SoundCue::Once { key, .. } | SoundCue::Loop { key, .. } => Some(key),
        }
    }
}

/// Audio output.
pub trait SoundPlayer: Send {
    /// Start playing `sound` once.
    fn play(&mut self, sound: &str) -> Result<(), AudioError>;

    /// Stop whatever is playing.
    fn stop(&mut self);
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Box<P> {
    fn play(&mut self, sound: &str) -> Result<(), AudioError> {
        (**self).play(sound)
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Player that only logs. Used when audio is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, sound: &str) -> Result<(), AudioError> {
        tracing::debug!(sound, "sound suppressed");
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Rings the terminal bell instead of fetching the sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellPlayer;

impl SoundPlayer for BellPlayer {
    fn play(&mut self, sound: &str) -> Result<(), AudioError> {
        use std::io::Write;
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| AudioError::Playback {
                sound: sound.to_string(),
                message: e.to_string(),
            })
    }

    fn stop(&mut self) {}
}

#[derive(Debug)]
struct Playing {
    key: CueKey,
    looping: bool,
    last_played: NaiveDateTime,
}

/// Keeps the player in line with the current cue.
pub struct AlertAudio<P: SoundPlayer> {
    player: P,
    repeat: Duration,
    current: Option<Playing>,
}

impl<P: SoundPlayer> AlertAudio<P> {
    pub fn new(player: P, repeat_secs: u64) -> Self {
        Self {
            player,
            repeat: Duration::seconds(repeat_secs.clamp(1, 86_400) as i64),
            current: None,
        }
    }

    /// Whether a loop is currently sounding.
    pub fn is_looping(&self) -> bool {
        self.current.as_ref().is_some_and(|p| p.looping)
    }

    /// Reconcile with `cue` at wall-clock `now`.
    pub fn apply(&mut self, cue: &SoundCue, now: NaiveDateTime) {
        let same_key = match (&self.current, cue.key()) {
            (Some(playing), Some(key)) => playing.key == *key,
            _ => false,
        };

        match cue {
            SoundCue::Silent => self.stop_loop(),
            SoundCue::Once { key, sound } => {
                if same_key {
                    return;
                }
                self.stop_loop();
                self.play(sound);
                self.current = Some(Playing {
                    key: key.clone(),
                    looping: false,
                    last_played: now,
                });
            }
            SoundCue::Loop { key, sound } => {
                if same_key && self.is_looping() {
                    let due = self
                        .current
                        .as_ref()
                        .is_some_and(|p| now - p.last_played >= self.repeat);
                    if due {
                        self.play(sound);
                        if let Some(playing) = self.current.as_mut() {
                            playing.last_played = now;
                        }
                    }
                    return;
                }
                self.stop_loop();
                self.play(sound);
                self.current = Some(Playing {
                    key: key.clone(),
                    looping: true,
                    last_played: now,
                });
            }
        }
    }

    /// Stop any loop. Called on teardown.
    pub fn shutdown(&mut self) {
        self.stop_loop();
        self.current = None;
    }

    fn stop_loop(&mut self) {
        if self.is_looping() {
            self.player.stop();
            if let Some(playing) = self.current.as_mut() {
                playing.looping = false;
            }
        }
    }

    fn play(&mut self, sound: &str) {
        if let Err(e) = self.player.play(sound) {
            tracing::debug!(error = %e, "alert sound failed");
        }
    }
}
