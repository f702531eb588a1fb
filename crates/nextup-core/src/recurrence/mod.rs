//! Recurrence definitions and the occurrence resolver.

mod resolver;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use resolver::{resolve, MonthEndPolicy, Resolver};

/// Three-letter day names indexed by `num_days_from_sunday`.
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// The one canonical recurrence a reminder follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// A single occurrence on `date`, or today when no date is set.
    OneTime { date: Option<NaiveDate> },
    Daily,
    /// Weekdays with Sunday = 0.
    Weekly { days: BTreeSet<u8> },
    /// Days of the month, 1-31.
    Monthly { days: BTreeSet<u8> },
}

impl Recurrence {
    /// Weekly recurrence over the valid (0-6) entries of `days`.
    /// Returns `None` when nothing valid remains.
    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Option<Self> {
        let days: BTreeSet<u8> = days.into_iter().filter(|d| *d <= 6).collect();
        (!days.is_empty()).then_some(Recurrence::Weekly { days })
    }

    /// Monthly recurrence over the valid (1-31) entries of `days`.
    /// Returns `None` when nothing valid remains.
    pub fn monthly(days: impl IntoIterator<Item = u8>) -> Option<Self> {
        let days: BTreeSet<u8> = days.into_iter().filter(|d| (1..=31).contains(d)).collect();
        (!days.is_empty()).then_some(Recurrence::Monthly { days })
    }

    pub fn label(&self) -> String {
        match self {
            Recurrence::OneTime { date: None } => "One Time".to_string(),
            Recurrence::OneTime { date: Some(date) } => format!("One Time ({date})"),
            Recurrence::Daily => "Daily".to_string(),
            Recurrence::Weekly { days } => {
                let names: Vec<&str> = days
                    .iter()
                    .filter_map(|d| WEEKDAY_ABBREVIATIONS.get(*d as usize).copied())
                    .collect();
                if names.is_empty() {
                    "Weekly".to_string()
                } else {
                    names.join(", ")
                }
            }
            Recurrence::Monthly { days } => {
                let days: Vec<String> = days.iter().map(u8::to_string).collect();
                format!("Monthly ({})", days.join(", "))
            }
        }
    }
}

/// Map a legacy day token (`Mon`, `monday`, `MON`) to its weekday index.
pub fn weekday_from_token(token: &str) -> Option<u8> {
    let token = token.trim().to_ascii_lowercase();
    if token.len() < 3 {
        return None;
    }
    WEEKDAY_NAMES
        .iter()
        .position(|name| *name == token || name[..3] == token)
        .map(|i| i as u8)
}
