//! Store records and their normalization into [`Reminder`]s.
//!
//! Records mirror the upstream document shape: camelCase keys, `_id` as the
//! identity, optional everything, and two generations of recurrence fields.
//! [`ReminderRecord::into_reminder`] collapses both generations into one
//! [`Recurrence`] so the resolver never sees the legacy form.
//!
//! Precedence:
//!
//! ```text
//! recurrenceType            -> that type (weekly/monthly need a non-empty day set)
//! weekDays / monthDays only -> weekly / monthly
//! type + days (legacy)      -> Daily if a "Daily" token is present, else weekly
//! otherwise                 -> unresolvable
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FlashMode, FlashSpeed, Reminder, Settings, Theme, WarningRule, DEFAULT_FLASH_DURATION_MIN};
use crate::recurrence::{weekday_from_token, Recurrence};

/// Legacy type tag for repeating reminders.
const LEGACY_RECURRING: &str = "Recurring";
/// Legacy type tag for one-off reminders.
const LEGACY_ONE_TIME: &str = "OneTime";
/// Legacy day token meaning every day.
const LEGACY_DAILY_TOKEN: &str = "Daily";

/// A warning rule as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningRuleRecord {
    #[serde(default)]
    pub minutes: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub flash: Option<bool>,
    #[serde(default)]
    pub flash_speed: Option<String>,
    #[serde(default)]
    pub flash_duration: Option<i64>,
    #[serde(default)]
    pub sound_url: Option<String>,
}

impl WarningRuleRecord {
    /// Rules without a usable lead time are dropped.
    pub fn into_rule(self) -> Option<WarningRule> {
        let minutes = u32::try_from(self.minutes?).ok()?;
        let flash_duration = self
            .flash_duration
            .and_then(|d| u32::try_from(d).ok())
            .unwrap_or(DEFAULT_FLASH_DURATION_MIN);
        Some(WarningRule {
            minutes,
            color: self.color.unwrap_or_default(),
            flash: self.flash.unwrap_or(false),
            flash_speed: self
                .flash_speed
                .as_deref()
                .map(FlashSpeed::parse_lenient)
                .unwrap_or_default(),
            flash_duration,
            sound_url: self.sound_url.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// A reminder document as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub target_time: Option<String>,

    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub week_days: Option<Vec<i64>>,
    #[serde(default)]
    pub month_days: Option<Vec<i64>>,

    /// Legacy day tokens (`Mon`, `Daily`, ...).
    #[serde(default)]
    pub days: Option<Vec<String>>,
    /// Legacy type tag (`Recurring` | `OneTime`).
    #[serde(rename = "type", default)]
    pub legacy_type: Option<String>,
    /// Calendar date for one-off reminders, `YYYY-MM-DD` or an ISO timestamp.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub warning_rules: Option<Vec<WarningRuleRecord>>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl ReminderRecord {
    /// Whether the record is active. Missing means active.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    /// Normalize into a [`Reminder`]. `fallback_id` is used when the record
    /// has no identity of its own.
    pub fn into_reminder(self, fallback_id: impl Into<String>) -> Reminder {
        let recurrence = self.recurrence();
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| fallback_id.into());
        let warning_rules = self
            .warning_rules
            .unwrap_or_default()
            .into_iter()
            .filter_map(WarningRuleRecord::into_rule)
            .collect();

        Reminder {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.filter(|d| !d.is_empty()),
            image_url: self.image_url.filter(|u| !u.is_empty()),
            target_time: self.target_time.unwrap_or_default(),
            recurrence,
            warning_rules,
            active: self.active.unwrap_or(true),
        }
    }

    fn recurrence(&self) -> Option<Recurrence> {
        let date = self.date.as_deref().and_then(parse_record_date);

        if let Some(kind) = self.recurrence_type.as_deref() {
            return match kind.trim().to_ascii_lowercase().as_str() {
                "none" => Some(Recurrence::OneTime { date }),
                "daily" => Some(Recurrence::Daily),
                "weekly" => Recurrence::weekly(int_days(&self.week_days)),
                "monthly" => Recurrence::monthly(int_days(&self.month_days)),
                _ => None,
            };
        }

        if non_empty(&self.week_days) {
            return Recurrence::weekly(int_days(&self.week_days));
        }
        if non_empty(&self.month_days) {
            return Recurrence::monthly(int_days(&self.month_days));
        }

        self.legacy_recurrence(date)
    }

    fn legacy_recurrence(&self, date: Option<NaiveDate>) -> Option<Recurrence> {
        match self.legacy_type.as_deref()? {
            LEGACY_ONE_TIME => Some(Recurrence::OneTime { date }),
            LEGACY_RECURRING => {
                let tokens = self.days.as_ref()?;
                if tokens.iter().any(|t| t.trim().eq_ignore_ascii_case(LEGACY_DAILY_TOKEN)) {
                    return Some(Recurrence::Daily);
                }
                Recurrence::weekly(tokens.iter().filter_map(|t| weekday_from_token(t)))
            }
            _ => None,
        }
    }
}

fn non_empty(days: &Option<Vec<i64>>) -> bool {
    days.as_ref().is_some_and(|d| !d.is_empty())
}

fn int_days(days: &Option<Vec<i64>>) -> impl Iterator<Item = u8> + '_ {
    days.iter()
        .flatten()
        .filter_map(|d| u8::try_from(*d).ok())
}

/// Take the calendar date from `YYYY-MM-DD` or the date part of an ISO
/// timestamp. No time-zone conversion is applied.
fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let head = value.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Normalize a batch of records, keeping their order. Records without an id
/// get a positional one.
pub fn normalize_records(records: Vec<ReminderRecord>) -> Vec<Reminder> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_reminder(format!("#{index}")))
        .collect()
}

/// The settings document as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub flash_mode: Option<String>,
}

impl SettingsRecord {
    pub fn into_settings(self) -> Settings {
        let theme = match self.theme.as_deref() {
            Some("light") => Theme::Light,
            Some("system") => Theme::System,
            _ => Theme::Dark,
        };
        let flash_mode = match self.flash_mode.as_deref() {
            Some("screen") => FlashMode::Screen,
            _ => FlashMode::Card,
        };
        Settings { theme, flash_mode }
    }
}
