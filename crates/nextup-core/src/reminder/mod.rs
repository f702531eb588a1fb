//! Reminder data model.
//!
//! A [`Reminder`] is the canonical, already-normalized form the engine works
//! on. Records coming from a store are converted by [`record`] so that every
//! reminder carries exactly one [`Recurrence`] (or none, if the stored
//! definition cannot be resolved).

pub mod record;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::recurrence::Recurrence;

pub use record::{normalize_records, ReminderRecord, SettingsRecord, WarningRuleRecord};

/// Default number of minutes a rule keeps flashing after its trigger instant.
pub const DEFAULT_FLASH_DURATION_MIN: u32 = 5;

/// How fast a flashing rule pulses. Only the renderer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl FlashSpeed {
    /// Lenient parse; anything unrecognized pulses at normal speed.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow" => FlashSpeed::Slow,
            "fast" => FlashSpeed::Fast,
            _ => FlashSpeed::Normal,
        }
    }

    /// Pulse period in milliseconds.
    pub fn period_ms(self) -> u64 {
        match self {
            FlashSpeed::Slow => 3000,
            FlashSpeed::Normal => 2000,
            FlashSpeed::Fast => 500,
        }
    }
}

/// A lead-time threshold paired with a visual/audio escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRule {
    /// Minutes before due at which this rule starts applying.
    pub minutes: u32,
    /// Style token, opaque to the engine.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub flash: bool,
    #[serde(default)]
    pub flash_speed: FlashSpeed,
    /// Minutes the flash stays on after the trigger instant.
    #[serde(default = "default_flash_duration")]
    pub flash_duration: u32,
    #[serde(default)]
    pub sound_url: Option<String>,
}

fn default_flash_duration() -> u32 {
    DEFAULT_FLASH_DURATION_MIN
}

impl WarningRule {
    pub fn new(minutes: u32, color: impl Into<String>) -> Self {
        Self {
            minutes,
            color: color.into(),
            flash: false,
            flash_speed: FlashSpeed::Normal,
            flash_duration: DEFAULT_FLASH_DURATION_MIN,
            sound_url: None,
        }
    }

    pub fn flashing(mut self, speed: FlashSpeed, duration_min: u32) -> Self {
        self.flash = true;
        self.flash_speed = speed;
        self.flash_duration = duration_min;
        self
    }

    pub fn with_sound(mut self, sound_url: impl Into<String>) -> Self {
        self.sound_url = Some(sound_url.into());
        self
    }
}

/// A reminder as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Time of day as stored (`HH:mm`). Kept verbatim for display.
    pub target_time: String,
    /// `None` when the stored definition cannot produce an occurrence.
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub warning_rules: Vec<WarningRule>,
    pub active: bool,
}

impl Reminder {
    /// Create an active reminder without warning rules.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target_time: impl Into<String>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            image_url: None,
            target_time: target_time.into(),
            recurrence: Some(recurrence),
            warning_rules: Vec::new(),
            active: true,
        }
    }

    pub fn with_rule(mut self, rule: WarningRule) -> Self {
        self.warning_rules.push(rule);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parsed `HH:mm` target time, or `None` if the stored text is malformed.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        crate::time::parse_time_of_day(&self.target_time)
    }

    /// Human-readable recurrence, e.g. `Mon, Wed` or `Monthly (1, 15)`.
    pub fn recurrence_label(&self) -> String {
        match &self.recurrence {
            Some(recurrence) => recurrence.label(),
            None => "Unscheduled".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

/// Whether a flashing rule pulses only the hero card or the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Card,
    Screen,
}

/// Global display settings. Read-only for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub flash_mode: FlashMode,
}
