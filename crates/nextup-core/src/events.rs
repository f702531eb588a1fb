use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::display::Board;

/// Transitions the clock driver observes between two consecutive boards,
/// plus the outcome of data refreshes. Sinks may log or render them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    /// A different reminder (or none) is now the hero.
    TopChanged {
        from: Option<String>,
        to: Option<String>,
        at: NaiveDateTime,
    },
    /// The hero's active warning rule changed to the rule with `minutes`.
    RuleActivated {
        reminder_id: String,
        minutes: u32,
        at: NaiveDateTime,
    },
    FlashStarted {
        reminder_id: String,
        minutes: u32,
        at: NaiveDateTime,
    },
    FlashEnded {
        reminder_id: String,
        at: NaiveDateTime,
    },
    Refreshed {
        reminders: usize,
        at: NaiveDateTime,
    },
    RefreshFailed {
        error: String,
        at: NaiveDateTime,
    },
}

impl BoardEvent {
    /// Events implied by going from `previous` to `next`.
    pub fn diff(previous: Option<&Board>, next: &Board) -> Vec<BoardEvent> {
        let at = next.now;
        let prev_top = previous.and_then(|b| b.top.as_ref());
        let next_top = next.top.as_ref();
        let prev_id = prev_top.map(|e| e.reminder.id.clone());
        let next_id = next_top.map(|e| e.reminder.id.clone());
        let mut events = Vec::new();

        let same_hero = prev_id == next_id;
        if !same_hero {
            events.push(BoardEvent::TopChanged {
                from: prev_id.clone(),
                to: next_id.clone(),
                at,
            });
        }

        if let Some(prev) = prev_top.filter(|e| e.flash_active) {
            let still_flashing = same_hero && next_top.is_some_and(|e| e.flash_active);
            if !still_flashing {
                events.push(BoardEvent::FlashEnded {
                    reminder_id: prev.reminder.id.clone(),
                    at,
                });
            }
        }

        if let Some(entry) = next_top {
            let prev_rule = prev_top
                .filter(|_| same_hero)
                .and_then(|e| e.active_rule.as_ref())
                .map(|r| r.minutes);
            let next_rule = entry.active_rule.as_ref().map(|r| r.minutes);

            if let Some(minutes) = next_rule.filter(|m| Some(*m) != prev_rule) {
                events.push(BoardEvent::RuleActivated {
                    reminder_id: entry.reminder.id.clone(),
                    minutes,
                    at,
                });
            }

            let was_flashing = same_hero && prev_top.is_some_and(|e| e.flash_active);
            if entry.flash_active && !was_flashing {
                events.push(BoardEvent::FlashStarted {
                    reminder_id: entry.reminder.id.clone(),
                    minutes: next_rule.unwrap_or_default(),
                    at,
                });
            }
        }

        events
    }
}
