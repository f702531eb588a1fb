//! Next-occurrence resolution.
//!
//! `resolve(reminder, now)` combines the reminder's `HH:mm` with `now`'s date
//! (`target_today`) and walks the recurrence forward to the first instant
//! that has not passed. "Passed" is decided at whole-minute granularity:
//! during the target minute itself the occurrence is still today's.
//!
//! ```text
//! OneTime  -> fixed date (may be in the past) or target_today
//! Daily    -> target_today, else +1 day
//! Weekly   -> today if listed and not passed, else next listed weekday (wraps)
//! Monthly  -> today if listed and not passed, else next listed day this month,
//!             else first listed day of next month; days past a month's end
//!             follow MonthEndPolicy in both steps
//! ```

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Recurrence;
use crate::reminder::Reminder;
use crate::time::{days_in_month, following_month, minutes_between};

/// What to do with a monthly day that the month lacks (the 31st in April).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthEndPolicy {
    /// Use the month's last day (the 31st becomes the 30th in April).
    #[default]
    Clamp,
    /// Overflow into the following month (the 31st of April is May 1st). A
    /// month never resolves a day it lacks.
    Roll,
}

impl MonthEndPolicy {
    fn place(self, year: i32, month: u32, day: u8) -> Option<NaiveDate> {
        let day = u32::from(day);
        match self {
            MonthEndPolicy::Clamp => {
                NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
            }
            MonthEndPolicy::Roll => NaiveDate::from_ymd_opt(year, month, 1)?
                .checked_add_signed(Duration::days(i64::from(day) - 1)),
        }
    }
}

/// Occurrence resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    month_end: MonthEndPolicy,
}

impl Resolver {
    pub fn new(month_end: MonthEndPolicy) -> Self {
        Self { month_end }
    }

    pub fn month_end(&self) -> MonthEndPolicy {
        self.month_end
    }

    /// Next occurrence of `reminder` relative to `now`, or `None` when the
    /// reminder has no resolvable recurrence or a malformed target time.
    pub fn resolve(&self, reminder: &Reminder, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let recurrence = reminder.recurrence.as_ref()?;
        let time = reminder.time_of_day()?;
        self.next_occurrence(recurrence, time, now)
    }

    pub fn next_occurrence(
        &self,
        recurrence: &Recurrence,
        time: NaiveTime,
        now: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let target_today = now.date().and_time(time);
        let not_passed = minutes_between(target_today, now) >= 0;

        match recurrence {
            Recurrence::OneTime { date: Some(date) } => Some(date.and_time(time)),
            Recurrence::OneTime { date: None } => Some(target_today),
            Recurrence::Daily => {
                if not_passed {
                    Some(target_today)
                } else {
                    target_today.checked_add_signed(Duration::days(1))
                }
            }
            Recurrence::Weekly { days } => {
                let current = now.weekday().num_days_from_sunday() as u8;
                let mut valid = days.iter().copied().filter(|d| *d <= 6);

                if not_passed && days.contains(&current) {
                    return Some(target_today);
                }

                let smallest = valid.clone().next()?;
                let next = valid.find(|d| *d > current).unwrap_or(smallest);
                let offset = if next > current {
                    next - current
                } else {
                    7 - current + next
                };
                target_today.checked_add_signed(Duration::days(i64::from(offset)))
            }
            Recurrence::Monthly { days } => {
                let today = now.day() as u8;
                let month_len = days_in_month(now.year(), now.month()) as u8;
                let valid = days.iter().copied().filter(|d| (1..=31).contains(d));
                let smallest = valid.clone().next()?;

                // Days of this month the set lands on. Clamp pulls days past
                // the month end onto its last day; Roll leaves them out.
                let this_month: BTreeSet<u8> = valid
                    .filter_map(|d| match self.month_end {
                        MonthEndPolicy::Clamp => Some(d.min(month_len)),
                        MonthEndPolicy::Roll => (d <= month_len).then_some(d),
                    })
                    .collect();

                if not_passed && this_month.contains(&today) {
                    return Some(target_today);
                }

                if let Some(next) = this_month.into_iter().find(|d| *d > today) {
                    return target_today.checked_add_signed(Duration::days(i64::from(next - today)));
                }

                let (year, month) = following_month(now.year(), now.month());
                let date = self.month_end.place(year, month, smallest)?;
                Some(date.and_time(time))
            }
        }
    }
}

/// Resolve with the default month-end policy.
pub fn resolve(reminder: &Reminder, now: NaiveDateTime) -> Option<NaiveDateTime> {
    Resolver::default().resolve(reminder, now)
}
