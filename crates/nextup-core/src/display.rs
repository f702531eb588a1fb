//! Display ranking.
//!
//! Turns a snapshot of reminders into the board: every active reminder
//! whose next occurrence has not passed, soonest first, with the head as
//! the hero entry. Everything here is recomputed from scratch on each tick.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::recurrence::Resolver;
use crate::reminder::{Reminder, Settings, WarningRule};
use crate::source::BoardData;
use crate::time::minutes_between;
use crate::warning::evaluate;

/// One reminder as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub reminder: Reminder,
    pub occurrence: NaiveDateTime,
    pub minutes_until: i64,
    pub active_rule: Option<WarningRule>,
    pub flash_active: bool,
    pub recurrence_label: String,
}

impl DisplayEntry {
    pub fn id(&self) -> &str {
        &self.reminder.id
    }
}

/// Rank `reminders` at `now`. Reminders that are inactive, unresolvable, or
/// already past are left out; ties keep input order.
pub fn rank(reminders: &[Reminder], now: NaiveDateTime, resolver: &Resolver) -> Vec<DisplayEntry> {
    let mut entries: Vec<DisplayEntry> = reminders
        .iter()
        .filter(|reminder| reminder.active)
        .filter_map(|reminder| {
            let occurrence = resolver.resolve(reminder, now)?;
            let minutes_until = minutes_between(occurrence, now);
            if minutes_until < 0 {
                return None;
            }
            let evaluation = evaluate(occurrence, now, &reminder.warning_rules);
            Some(DisplayEntry {
                reminder: reminder.clone(),
                occurrence,
                minutes_until,
                active_rule: evaluation.active_rule,
                flash_active: evaluation.flash_active,
                recurrence_label: reminder.recurrence_label(),
            })
        })
        .collect();

    entries.sort_by_key(|entry| entry.minutes_until);
    entries
}

/// Full display state for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub now: NaiveDateTime,
    pub settings: Settings,
    /// The hero entry.
    pub top: Option<DisplayEntry>,
    /// Everything after the hero, soonest first.
    pub up_next: Vec<DisplayEntry>,
}

impl Board {
    /// Split ranked entries into hero and the rest.
    pub fn new(now: NaiveDateTime, settings: Settings, entries: Vec<DisplayEntry>) -> Self {
        let mut entries = entries.into_iter();
        let top = entries.next();
        Self {
            now,
            settings,
            top,
            up_next: entries.collect(),
        }
    }

    /// Resolve, evaluate and rank one snapshot.
    pub fn compute(data: &BoardData, now: NaiveDateTime, resolver: &Resolver) -> Self {
        Self::new(now, data.settings, rank(&data.reminders, now, resolver))
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Hero first, then the rest.
    pub fn entries(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.top.iter().chain(self.up_next.iter())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Recurrence;
    use crate::reminder::FlashSpeed;
    use crate::time::parse_local_timestamp;

    fn at(s: &str) -> NaiveDateTime {
        parse_local_timestamp(s).unwrap()
    }

    fn resolver() -> Resolver {
        Resolver::default()
    }

    #[test]
    fn soonest_first() {
        let reminders = vec![
            Reminder::new("late", "Late", "17:00", Recurrence::Daily),
            Reminder::new("soon", "Soon", "10:30", Recurrence::Daily),
        ];
        let entries = rank(&reminders, at("2026-10-19 10:00"), &resolver());
        let ids: Vec<&str> = entries.iter().map(DisplayEntry::id).collect();
        assert_eq!(ids, ["soon", "late"]);
        assert_eq!(entries[0].minutes_until, 30);
    }

    #[test]
    fn passed_one_time_reminder_disappears() {
        let reminders = vec![Reminder::new(
            "gone",
            "Gone",
            "09:59",
            Recurrence::OneTime { date: None },
        )];
        assert!(rank(&reminders, at("2026-10-19 10:00"), &resolver()).is_empty());
    }

    #[test]
    fn inactive_and_unresolvable_are_skipped() {
        let mut inactive = Reminder::new("off", "Off", "11:00", Recurrence::Daily);
        inactive.active = false;
        let mut broken = Reminder::new("broken", "Broken", "11:00", Recurrence::Daily);
        broken.recurrence = None;
        let entries = rank(&[inactive, broken], at("2026-10-19 10:00"), &resolver());
        assert!(entries.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let reminders = vec![
            Reminder::new("b", "B", "11:00", Recurrence::Daily),
            Reminder::new("a", "A", "11:00", Recurrence::Daily),
        ];
        let entries = rank(&reminders, at("2026-10-19 10:00"), &resolver());
        let ids: Vec<&str> = entries.iter().map(DisplayEntry::id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn entries_carry_rule_state() {
        let reminders = vec![Reminder::new("r", "R", "10:10", Recurrence::Daily)
            .with_rule(WarningRule::new(10, "red").flashing(FlashSpeed::Fast, 5))];
        let entries = rank(&reminders, at("2026-10-19 10:00"), &resolver());
        assert_eq!(entries[0].active_rule.as_ref().unwrap().color, "red");
        assert!(entries[0].flash_active);
        assert_eq!(entries[0].recurrence_label, "Daily");
    }

    #[test]
    fn board_splits_hero_from_rest() {
        let data = BoardData {
            reminders: vec![
                Reminder::new("a", "A", "12:00", Recurrence::Daily),
                Reminder::new("b", "B", "11:00", Recurrence::Daily),
                Reminder::new("c", "C", "13:00", Recurrence::Daily),
            ],
            settings: Settings::default(),
        };
        let board = Board::compute(&data, at("2026-10-19 10:00"), &resolver());
        assert_eq!(board.top.as_ref().unwrap().id(), "b");
        assert_eq!(board.up_next.len(), 2);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn empty_board_has_no_hero() {
        let board = Board::compute(&BoardData::default(), at("2026-10-19 10:00"), &resolver());
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
    }
}
