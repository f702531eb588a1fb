//! Terminal rendering for boards.

use std::fmt::Write as _;
use std::io::Write as _;

use nextup_core::{Board, BoardEvent, DisplayEntry, DisplaySink};

/// Human lead time: `now`, `25 min`, `2h 05m`, `3d 4h`.
pub fn format_lead(minutes: i64) -> String {
    match minutes {
        i64::MIN..=0 => "now".to_string(),
        1..=59 => format!("{minutes} min"),
        60..=1439 => format!("{}h {:02}m", minutes / 60, minutes % 60),
        _ => format!("{}d {}h", minutes / 1440, (minutes % 1440) / 60),
    }
}

fn rule_line(entry: &DisplayEntry) -> Option<String> {
    let rule = entry.active_rule.as_ref()?;
    let mut line = format!("warning {} min, {}", rule.minutes, rule.color);
    if entry.flash_active {
        let _ = write!(
            line,
            ", FLASHING ({:?}, {}ms)",
            rule.flash_speed,
            rule.flash_speed.period_ms()
        );
    }
    Some(line)
}

/// Plain-text board.
pub fn board_text(board: &Board) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "nextup  {}", board.now.format("%a %Y-%m-%d %H:%M"));
    let _ = writeln!(out);

    let Some(top) = board.top.as_ref() else {
        let _ = writeln!(out, "  Nothing coming up.");
        return out;
    };

    let _ = writeln!(
        out,
        "> {}  in {}  ({} at {})",
        top.reminder.title,
        format_lead(top.minutes_until),
        top.recurrence_label,
        top.occurrence.format("%H:%M"),
    );
    if let Some(description) = top.reminder.description.as_deref() {
        let _ = writeln!(out, "  {description}");
    }
    if let Some(line) = rule_line(top) {
        let _ = writeln!(out, "  {line}");
    }

    if !board.up_next.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Up next");
        for entry in &board.up_next {
            let _ = writeln!(
                out,
                "  {}  {:<24} in {:<8} {}",
                entry.occurrence.format("%a %H:%M"),
                entry.reminder.title,
                format_lead(entry.minutes_until),
                entry.recurrence_label,
            );
        }
    }
    out
}

/// Writes boards to stdout, either redrawing text or as JSON lines.
pub struct TerminalSink {
    json: bool,
    last_frame: Option<String>,
}

impl TerminalSink {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last_frame: None,
        }
    }
}

impl DisplaySink for TerminalSink {
    fn publish(&mut self, board: &Board) {
        let mut stdout = std::io::stdout().lock();
        if self.json {
            match serde_json::to_string(board) {
                Ok(line) => {
                    let _ = writeln!(stdout, "{line}");
                }
                Err(e) => tracing::warn!(error = %e, "failed to encode board"),
            }
        } else {
            let frame = board_text(board);
            if self.last_frame.as_deref() == Some(frame.as_str()) {
                return;
            }
            let _ = write!(stdout, "\x1b[2J\x1b[H{frame}");
            self.last_frame = Some(frame);
        }
        let _ = stdout.flush();
    }

    fn event(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::RefreshFailed { error, .. } => tracing::warn!(%error, "source refresh failed"),
            BoardEvent::FlashStarted { reminder_id, minutes, .. } => {
                tracing::info!(%reminder_id, minutes, "flash started")
            }
            other => tracing::debug!(event = ?other, "board event"),
        }
    }
}
