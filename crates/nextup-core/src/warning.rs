//! Warning rule evaluation.
//!
//! A rule is *active* for its whole lead-time window (`diff <= minutes`);
//! among active rules the one with the smallest lead time wins. Flashing is
//! a narrower sub-state: it starts at the rule's trigger instant
//! (`occurrence - minutes`) and lasts `flash_duration` minutes.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reminder::WarningRule;
use crate::time::minutes_between;

/// Outcome of evaluating a reminder's rules at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub active_rule: Option<WarningRule>,
    pub flash_active: bool,
}

/// Evaluate `rules` for an occurrence that has not passed yet.
pub fn evaluate(occurrence: NaiveDateTime, now: NaiveDateTime, rules: &[WarningRule]) -> Evaluation {
    let diff = minutes_between(occurrence, now);

    // Stable: equal lead times keep storage order.
    let mut sorted: Vec<&WarningRule> = rules.iter().collect();
    sorted.sort_by_key(|rule| rule.minutes);

    let Some(rule) = sorted
        .into_iter()
        .find(|rule| diff <= i64::from(rule.minutes))
    else {
        return Evaluation::default();
    };

    Evaluation {
        active_rule: Some(rule.clone()),
        flash_active: flash_window_open(rule, occurrence, now),
    }
}

/// Whether `now` falls inside the rule's flash window.
pub fn flash_window_open(rule: &WarningRule, occurrence: NaiveDateTime, now: NaiveDateTime) -> bool {
    if !rule.flash {
        return false;
    }
    let trigger = occurrence - Duration::minutes(i64::from(rule.minutes));
    let since_trigger = minutes_between(now, trigger);
    (0..i64::from(rule.flash_duration)).contains(&since_trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::FlashSpeed;
    use crate::time::parse_local_timestamp;

    fn at(s: &str) -> NaiveDateTime {
        parse_local_timestamp(s).unwrap()
    }

    fn rules() -> Vec<WarningRule> {
        vec![
            WarningRule::new(60, "yellow"),
            WarningRule::new(10, "orange").flashing(FlashSpeed::Slow, 5),
            WarningRule::new(0, "red").flashing(FlashSpeed::Fast, 5),
        ]
    }

    #[test]
    fn no_rules_no_state() {
        let eval = evaluate(at("2026-10-19 10:00"), at("2026-10-19 09:59"), &[]);
        assert_eq!(eval, Evaluation::default());
    }

    #[test]
    fn outside_every_window_no_state() {
        let eval = evaluate(at("2026-10-19 12:00"), at("2026-10-19 10:00"), &rules());
        assert!(eval.active_rule.is_none());
        assert!(!eval.flash_active);
    }

    #[test]
    fn selects_smallest_applicable_rule() {
        let occurrence = at("2026-10-19 10:00");
        let eval = evaluate(occurrence, at("2026-10-19 09:30"), &rules());
        assert_eq!(eval.active_rule.unwrap().minutes, 60);

        let eval = evaluate(occurrence, at("2026-10-19 09:55"), &rules());
        assert_eq!(eval.active_rule.unwrap().minutes, 10);

        let eval = evaluate(occurrence, at("2026-10-19 10:00"), &rules());
        assert_eq!(eval.active_rule.unwrap().minutes, 0);
    }

    #[test]
    fn flash_starts_at_trigger_and_expires() {
        let occurrence = at("2026-10-19 10:00");
        let rules = vec![WarningRule::new(10, "orange").flashing(FlashSpeed::Normal, 5)];

        let eval = evaluate(occurrence, at("2026-10-19 09:50"), &rules);
        assert!(eval.flash_active);

        let eval = evaluate(occurrence, at("2026-10-19 09:54:59"), &rules);
        assert!(eval.flash_active);

        let eval = evaluate(occurrence, at("2026-10-19 09:55"), &rules);
        assert!(!eval.flash_active);
        assert_eq!(eval.active_rule.unwrap().minutes, 10);

        let eval = evaluate(occurrence, at("2026-10-19 09:58"), &rules);
        assert!(!eval.flash_active);
    }

    #[test]
    fn non_flashing_rule_never_flashes() {
        let occurrence = at("2026-10-19 10:00");
        let eval = evaluate(occurrence, at("2026-10-19 09:00"), &rules());
        assert_eq!(eval.active_rule.unwrap().minutes, 60);
        assert!(!eval.flash_active);
    }

    #[test]
    fn equal_lead_times_keep_storage_order() {
        let occurrence = at("2026-10-19 10:00");
        let rules = vec![WarningRule::new(15, "first"), WarningRule::new(15, "second")];
        let eval = evaluate(occurrence, at("2026-10-19 09:50"), &rules);
        assert_eq!(eval.active_rule.unwrap().color, "first");
    }

    #[test]
    fn zero_duration_flash_never_fires() {
        let occurrence = at("2026-10-19 10:00");
        let rules = vec![WarningRule::new(10, "x").flashing(FlashSpeed::Fast, 0)];
        assert!(!evaluate(occurrence, at("2026-10-19 09:50"), &rules).flash_active);
    }
}
