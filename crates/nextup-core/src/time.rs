//! Civil-time helpers shared by the resolver, evaluator and ranker.
//!
//! All arithmetic happens on naive local timestamps. There is no time-zone
//! conversion anywhere in the engine.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Whole minutes from `earlier` to `later`, truncated toward zero.
pub fn minutes_between(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (later - earlier).num_minutes()
}

/// Parse an `HH:mm` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = following_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// The (year, month) after the given one, rolling December into January.
pub fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Parse `YYYY-MM-DD HH:MM` (or with a `T` separator) as a local timestamp.
pub fn parse_local_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
