use chrono::NaiveDateTime;
use clap::Subcommand;
use nextup_core::time::minutes_between;
use nextup_core::{evaluate, Reminder, Resolver, WarningRule};
use serde::Serialize;

use super::{resolve_now, Context};
use crate::render::format_lead;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// List every active reminder with its next occurrence
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Evaluate at this local time ("YYYY-MM-DD HH:MM") instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show one reminder's occurrence, lead time and warning state as JSON
    Next {
        /// Reminder ID
        id: String,
        /// Evaluate at this local time ("YYYY-MM-DD HH:MM") instead of now
        #[arg(long)]
        at: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct ReminderSummary<'a> {
    id: &'a str,
    title: &'a str,
    target_time: &'a str,
    recurrence: String,
    next_occurrence: Option<NaiveDateTime>,
    minutes_until: Option<i64>,
    rules: usize,
}

#[derive(Debug, Serialize)]
struct NextReport<'a> {
    id: &'a str,
    title: &'a str,
    now: NaiveDateTime,
    occurrence: Option<NaiveDateTime>,
    minutes_until: Option<i64>,
    /// Whether the board would show it right now.
    shown: bool,
    active_rule: Option<WarningRule>,
    flash_active: bool,
}

fn summarize<'a>(
    reminder: &'a Reminder,
    now: NaiveDateTime,
    resolver: &Resolver,
) -> ReminderSummary<'a> {
    let next_occurrence = resolver.resolve(reminder, now);
    ReminderSummary {
        id: &reminder.id,
        title: &reminder.title,
        target_time: &reminder.target_time,
        recurrence: reminder.recurrence_label(),
        next_occurrence,
        minutes_until: next_occurrence.map(|at| minutes_between(at, now)),
        rules: reminder.warning_rules.len(),
    }
}

fn report<'a>(reminder: &'a Reminder, now: NaiveDateTime, resolver: &Resolver) -> NextReport<'a> {
    let occurrence = resolver.resolve(reminder, now);
    let minutes_until = occurrence.map(|at| minutes_between(at, now));
    let shown = reminder.active && minutes_until.is_some_and(|m| m >= 0);
    let evaluation = occurrence
        .filter(|_| shown)
        .map(|at| evaluate(at, now, &reminder.warning_rules))
        .unwrap_or_default();

    NextReport {
        id: &reminder.id,
        title: &reminder.title,
        now,
        occurrence,
        minutes_until,
        shown,
        active_rule: evaluation.active_rule,
        flash_active: evaluation.flash_active,
    }
}

pub fn run(ctx: &Context, action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = ctx.config.resolver();

    match action {
        ReminderAction::List { json, at } => {
            let now = resolve_now(at.as_deref())?;
            let data = ctx.load()?;
            let summaries: Vec<ReminderSummary> = data
                .reminders
                .iter()
                .map(|r| summarize(r, now, &resolver))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("No reminders.");
            } else {
                for s in &summaries {
                    let next = match (s.next_occurrence, s.minutes_until) {
                        (Some(at), Some(m)) if m >= 0 => {
                            format!("{} (in {})", at.format("%Y-%m-%d %H:%M"), format_lead(m))
                        }
                        (Some(at), _) => format!("{} (passed)", at.format("%Y-%m-%d %H:%M")),
                        _ => "-".to_string(),
                    };
                    println!("{:<16} {:<24} {:<20} {}", s.id, s.title, s.recurrence, next);
                }
            }
        }
        ReminderAction::Next { id, at } => {
            let now = resolve_now(at.as_deref())?;
            let data = ctx.load()?;
            let reminder = data
                .find(&id)
                .ok_or_else(|| format!("no reminder with id '{id}'"))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report(reminder, now, &resolver))?
            );
        }
    }
    Ok(())
}
