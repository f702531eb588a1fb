//! End-to-end board behavior from upstream-shaped JSON.

use chrono::NaiveDateTime;
use nextup_core::time::parse_local_timestamp;
use nextup_core::{
    rank, Board, BoardData, FileSource, FlashMode, MonthEndPolicy, ReminderSource, Resolver, Theme,
};

fn at(s: &str) -> NaiveDateTime {
    parse_local_timestamp(s).unwrap()
}

// 2026-10-19 is a Monday.
const BOARD: &str = r#"{
  "settings": { "theme": "light", "flashMode": "screen" },
  "reminders": [
    {
      "_id": "meds",
      "title": "Take medication",
      "targetTime": "09:00",
      "recurrenceType": "daily",
      "warningRules": [
        { "minutes": 60, "color": "yellow" },
        { "minutes": 10, "color": "orange", "flash": true, "flashSpeed": "fast", "flashDuration": 5 },
        { "minutes": 0, "color": "red", "flash": true }
      ]
    },
    {
      "_id": "gym",
      "title": "Gym",
      "targetTime": "18:00",
      "recurrenceType": "weekly",
      "weekDays": [1, 3, 5]
    },
    {
      "_id": "rent",
      "title": "Pay rent",
      "targetTime": "08:00",
      "recurrenceType": "monthly",
      "monthDays": [1, 15]
    },
    {
      "_id": "legacy",
      "title": "Team sync",
      "targetTime": "11:00",
      "type": "Recurring",
      "days": ["Mon", "Wed"]
    },
    {
      "_id": "archived",
      "title": "Old",
      "targetTime": "10:00",
      "recurrenceType": "daily",
      "active": false
    },
    {
      "_id": "broken",
      "title": "No schedule",
      "targetTime": "10:00"
    }
  ]
}"#;

fn board_at(now: &str) -> Board {
    let data = BoardData::from_json(BOARD).unwrap();
    Board::compute(&data, at(now), &Resolver::default())
}

fn ids(board: &Board) -> Vec<String> {
    board.entries().map(|e| e.id().to_string()).collect()
}

#[test]
fn board_orders_upcoming_reminders() {
    let board = board_at("2026-10-19 08:30");

    assert_eq!(board.settings.theme, Theme::Light);
    assert_eq!(board.settings.flash_mode, FlashMode::Screen);
    assert_eq!(ids(&board), ["meds", "legacy", "gym", "rent"]);

    let top = board.top.as_ref().unwrap();
    assert_eq!(top.minutes_until, 30);
    assert_eq!(top.active_rule.as_ref().unwrap().minutes, 60);
    assert!(!top.flash_active);
}

#[test]
fn daily_after_target_rolls_to_tomorrow() {
    let board = board_at("2026-10-19 09:30");
    let meds = board.entries().find(|e| e.id() == "meds").unwrap();
    assert_eq!(meds.occurrence, at("2026-10-20 09:00"));
    assert_eq!(meds.minutes_until, 23 * 60 + 30);
}

#[test]
fn weekly_picks_wednesday_from_tuesday() {
    let board = board_at("2026-10-20 10:00");
    let gym = board.entries().find(|e| e.id() == "gym").unwrap();
    assert_eq!(gym.occurrence, at("2026-10-21 18:00"));
}

#[test]
fn weekly_wraps_to_next_week() {
    let data = BoardData::from_json(
        r#"[{"_id":"mon","targetTime":"09:00","recurrenceType":"weekly","weekDays":[1]}]"#,
    )
    .unwrap();
    let entries = rank(&data.reminders, at("2026-10-20 10:00"), &Resolver::default());
    assert_eq!(entries[0].occurrence, at("2026-10-26 09:00"));
}

#[test]
fn monthly_after_last_day_rolls_to_next_month() {
    let board = board_at("2026-10-20 12:00");
    let rent = board.entries().find(|e| e.id() == "rent").unwrap();
    assert_eq!(rent.occurrence, at("2026-11-01 08:00"));
}

#[test]
fn month_end_policy_decides_short_months() {
    let data = BoardData::from_json(
        r#"[{"_id":"eom","targetTime":"09:00","recurrenceType":"monthly","monthDays":[31]}]"#,
    )
    .unwrap();
    let now = at("2026-10-31 10:00");

    let clamp = rank(&data.reminders, now, &Resolver::new(MonthEndPolicy::Clamp));
    let roll = rank(&data.reminders, now, &Resolver::new(MonthEndPolicy::Roll));

    assert_eq!(clamp[0].occurrence, at("2026-11-30 09:00"));
    assert_eq!(roll[0].occurrence, at("2026-12-01 09:00"));
}

#[test]
fn legacy_days_behave_like_weekly() {
    // Tuesday: next Mon/Wed slot is Wednesday.
    let board = board_at("2026-10-20 12:00");
    let legacy = board.entries().find(|e| e.id() == "legacy").unwrap();
    assert_eq!(legacy.occurrence, at("2026-10-21 11:00"));
    assert_eq!(legacy.recurrence_label, "Mon, Wed");
}

#[test]
fn inactive_and_unresolvable_are_hidden() {
    let board = board_at("2026-10-19 08:30");
    let ids = ids(&board);
    assert!(!ids.contains(&"archived".to_string()));
    assert!(!ids.contains(&"broken".to_string()));
}

#[test]
fn smallest_applicable_rule_wins() {
    assert_eq!(
        board_at("2026-10-19 08:30").top.unwrap().active_rule.unwrap().minutes,
        60
    );
    assert_eq!(
        board_at("2026-10-19 08:55").top.unwrap().active_rule.unwrap().minutes,
        10
    );
}

#[test]
fn flash_window_closes_after_duration() {
    let opened = board_at("2026-10-19 08:50").top.unwrap();
    assert!(opened.flash_active);

    let closed = board_at("2026-10-19 08:55").top.unwrap();
    assert_eq!(closed.active_rule.unwrap().minutes, 10);
    assert!(!closed.flash_active);
}

#[test]
fn recomputation_is_idempotent() {
    let first = serde_json::to_string(&board_at("2026-10-19 08:30")).unwrap();
    let second = serde_json::to_string(&board_at("2026-10-19 08:30")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn passed_one_time_reminder_disappears() {
    let data = BoardData::from_json(
        r#"[{"_id":"once","targetTime":"09:00","recurrenceType":"none","date":"2026-10-19"}]"#,
    )
    .unwrap();
    let resolver = Resolver::default();

    assert_eq!(rank(&data.reminders, at("2026-10-19 09:00:30"), &resolver).len(), 1);
    assert!(rank(&data.reminders, at("2026-10-19 09:01"), &resolver).is_empty());
}

#[test]
fn equal_lead_times_keep_input_order() {
    let data = BoardData::from_json(
        r#"[{"_id":"b","targetTime":"10:00","recurrenceType":"daily"},
            {"_id":"a","targetTime":"10:00","recurrenceType":"daily"},
            {"_id":"c","targetTime":"10:00","recurrenceType":"daily"}]"#,
    )
    .unwrap();
    let entries = rank(&data.reminders, at("2026-10-19 09:00"), &Resolver::default());
    let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

#[tokio::test]
async fn file_source_feeds_the_board() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");
    std::fs::write(&path, BOARD).unwrap();

    let data = FileSource::new(&path).load().await.unwrap();
    let board = Board::compute(&data, at("2026-10-19 08:30"), &Resolver::default());
    assert_eq!(board.top.unwrap().id(), "meds");
}
