use chrono::{Duration, TimeZone, Utc};
use lesson_flow::domain::HeartsSnapshot;
use lesson_flow::hearts::{HeartLedger, DEFAULT_MAX_HEARTS};

fn t0() -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

fn snap(hearts: u32, max: u32, next: Option<i64>) -> HeartsSnapshot {
  HeartsSnapshot { hearts, max_hearts: max, next_heart_in_seconds: next }
}

#[test]
fn ledger_defaults_before_first_snapshot() {
  let ledger = HeartLedger::new();
  assert_eq!(ledger.max_hearts(), DEFAULT_MAX_HEARTS);
  // assume a full pool until the server says otherwise
  assert_eq!(ledger.hearts(), DEFAULT_MAX_HEARTS);
  assert!(ledger.is_full());
  assert!(ledger.remaining_seconds(t0()).is_none());
}

#[test]
fn apply_replaces_the_snapshot_wholesale() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(2, 5, Some(120)), t0());
  assert_eq!(ledger.hearts(), 2);
  assert_eq!(ledger.max_hearts(), 5);

  // a mutation response may change max_hearts too
  ledger.apply(snap(3, 6, Some(90)), t0());
  assert_eq!(ledger.hearts(), 3);
  assert_eq!(ledger.max_hearts(), 6);
}

#[test]
fn countdown_is_a_projection_over_wall_clock() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(1, 5, Some(120)), t0());

  assert_eq!(ledger.remaining_seconds(t0()), Some(120));
  assert_eq!(ledger.remaining_seconds(t0() + Duration::seconds(45)), Some(75));
  // clamped at zero, never negative
  assert_eq!(ledger.remaining_seconds(t0() + Duration::seconds(500)), Some(0));
  // the projection never touches the authoritative count
  assert_eq!(ledger.hearts(), 1);
}

#[test]
fn no_countdown_when_full_or_regen_disabled() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(5, 5, None), t0());
  assert!(ledger.remaining_seconds(t0()).is_none());

  // below max but regeneration disabled
  ledger.apply(snap(2, 5, None), t0());
  assert!(ledger.remaining_seconds(t0()).is_none());

  // a negative value from the server is treated as disabled
  ledger.apply(snap(2, 5, Some(-1)), t0());
  assert!(ledger.remaining_seconds(t0()).is_none());
}

#[test]
fn countdown_label_formats_minutes_and_hours() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(1, 5, Some(125)), t0());
  assert_eq!(ledger.countdown_label(t0()).expect("label"), "02:05");

  ledger.apply(snap(1, 5, Some(3700)), t0());
  assert_eq!(ledger.countdown_label(t0()).expect("label"), "1:01:40");

  ledger.apply(snap(1, 5, Some(0)), t0());
  assert_eq!(ledger.countdown_label(t0()).expect("label"), "00:00");
}

#[test]
fn refresh_fires_exactly_once_at_predicted_zero() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(1, 5, Some(10)), t0());

  // not due yet
  assert!(!ledger.take_refresh_due(t0() + Duration::seconds(5)));
  // due: fires once...
  assert!(ledger.take_refresh_due(t0() + Duration::seconds(10)));
  // ...and only once until the next snapshot arrives
  assert!(!ledger.take_refresh_due(t0() + Duration::seconds(11)));
  assert!(!ledger.take_refresh_due(t0() + Duration::seconds(60)));

  // a fresh snapshot re-arms the latch
  ledger.apply(snap(1, 5, Some(10)), t0() + Duration::seconds(61));
  assert!(ledger.take_refresh_due(t0() + Duration::seconds(71)));
}

#[test]
fn server_reported_zero_max_is_clamped_to_one() {
  let mut ledger = HeartLedger::new();
  ledger.apply(snap(0, 0, None), t0());
  assert_eq!(ledger.max_hearts(), 1);
}
