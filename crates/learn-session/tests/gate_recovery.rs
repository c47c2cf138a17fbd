use chrono::{Duration, TimeZone, Utc};
use learn_domain::{ExerciseDef, Lesson, Section};
use learn_session::{AttemptOutcome, LessonSession, RecoveryOption, SessionConfig};
use lesson_flow::stubs::InMemoryLearningApi;
use std::sync::Arc;
use uuid::Uuid;

fn t0() -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 3, 3, 18, 0, 0).unwrap()
}

fn quiz_course(api: &InMemoryLearningApi) -> Uuid {
  let course = Uuid::new_v4();
  let quiz = ExerciseDef::from_parts(Uuid::new_v4(), "¿7x8?", vec!["54".into(), "56".into(), "58".into()], 1)
    .expect("exercise");
  let q = Section::from_parts(Uuid::new_v4(), "quiz", 1, true, None, None, Some(quiz), false).expect("section");
  let t = Section::from_parts(Uuid::new_v4(), "texto", 2, true, Some("repaso".into()), None, None, false)
    .expect("section");
  api.seed_lessons(course,
                   vec![Lesson::from_parts(Uuid::new_v4(), "tabla del 7", None, None, None, vec![q, t], false)
                          .expect("lesson")]);
  course
}

#[tokio::test]
async fn out_of_hearts_blocks_and_practice_recovers() {
  // maxHearts=5, one heart left, 120 s to the next regen
  let api = Arc::new(InMemoryLearningApi::with_hearts(1, 5, 120));
  let course = quiz_course(&api);
  let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course, t0()).await.expect("open");
  assert!(!session.is_blocked());

  // wrong answer burns the last heart
  let outcome = session.submit_exercise(0, t0()).await.expect("submit");
  assert_eq!(outcome, AttemptOutcome::Incorrect { hearts_left: 0, blocked: true });
  assert!(session.is_blocked());

  // the recovery surface offers wait / practice / refill
  let options = session.recovery_options(t0());
  assert_eq!(options,
             vec![RecoveryOption::Wait { countdown: Some("02:00".into()) },
                  RecoveryOption::Practice,
                  RecoveryOption::Refill]);

  // a successful grant unblocks immediately and hides the surface
  let hearts = session.practice(t0() + Duration::seconds(5)).await.expect("practice");
  assert_eq!(hearts, 1);
  assert!(!session.is_blocked());
  assert!(session.recovery_options(t0() + Duration::seconds(5)).is_empty());
}

#[tokio::test]
async fn no_advancement_while_blocked_no_matter_how_many_events_fire() {
  let api = Arc::new(InMemoryLearningApi::with_hearts(0, 5, 120));
  let course = quiz_course(&api);
  let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course, t0()).await.expect("open");
  assert!(session.is_blocked());

  let start_key = session.current_step().expect("step").key().to_string();
  for _ in 0..5 {
    // even the right answer cannot advance while gated
    let err = session.submit_exercise(1, t0()).await.expect_err("blocked");
    assert!(err.is_blocked());
  }
  assert_eq!(session.current_step().expect("step").key(), start_key);
  // no completion call ever reached the server
  assert!(api.completed_sections().is_empty());
  assert!(api.completed_lessons().is_empty());
}

#[tokio::test]
async fn blocked_failed_attempts_decrement_only_when_configured() {
  // default: attempts while gated are dropped client-side
  let api = Arc::new(InMemoryLearningApi::with_hearts(0, 5, 120));
  let course = quiz_course(&api);
  let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course, t0()).await.expect("open");
  let outcome = session.submit_exercise(0, t0()).await.expect("submit");
  assert_eq!(outcome, AttemptOutcome::Incorrect { hearts_left: 0, blocked: true });
  assert_eq!(api.heart_mutation_count(), 0);

  // opt-in: the decrement is still sent so the attempt is recorded
  let api = Arc::new(InMemoryLearningApi::with_hearts(0, 5, 120));
  let course = quiz_course(&api);
  let config = SessionConfig { decrement_while_blocked: true, ..SessionConfig::default() };
  let mut session = LessonSession::open(api.clone(), config, course, t0()).await.expect("open");
  let outcome = session.submit_exercise(0, t0()).await.expect("submit");
  assert_eq!(outcome, AttemptOutcome::Incorrect { hearts_left: 0, blocked: true });
  assert_eq!(api.heart_mutation_count(), 1);
}

#[tokio::test]
async fn refill_clears_the_blocked_state() {
  let api = Arc::new(InMemoryLearningApi::with_hearts(0, 5, 120));
  let course = quiz_course(&api);
  let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course, t0()).await.expect("open");
  assert!(session.is_blocked());

  let hearts = session.refill(t0()).await.expect("refill");
  assert_eq!(hearts, 5);
  assert!(!session.is_blocked());
  assert!(session.recovery_options(t0()).is_empty());
}

#[tokio::test]
async fn hearts_disabled_never_blocks_nor_decrements() {
  let api = Arc::new(InMemoryLearningApi::with_hearts(0, 5, 120));
  let course = quiz_course(&api);
  let config = SessionConfig { hearts_enabled: false, ..SessionConfig::default() };
  let mut session = LessonSession::open(api.clone(), config, course, t0()).await.expect("open");
  assert!(!session.is_blocked());

  let outcome = session.submit_exercise(0, t0()).await.expect("submit");
  assert_eq!(outcome, AttemptOutcome::Incorrect { hearts_left: 0, blocked: false });
  assert_eq!(api.heart_mutation_count(), 0);
}

#[tokio::test]
async fn predicted_zero_triggers_exactly_one_refresh() {
  // one heart short of max: a 10 s countdown is running
  let api = Arc::new(InMemoryLearningApi::with_hearts(4, 5, 10));
  let course = quiz_course(&api);
  let mut session = LessonSession::open(api.clone(), SessionConfig::default(), course, t0()).await.expect("open");
  assert_eq!(api.fetch_hearts_count(), 1);

  // countdown still running: no refresh
  let report = session.tick(t0() + Duration::seconds(6)).await;
  assert!(!report.hearts_refreshed);
  assert_eq!(report.countdown.as_deref(), Some("00:04"));
  assert_eq!(api.fetch_hearts_count(), 1);

  // projection hits zero: one re-fetch, not an open-ended poll
  let report = session.tick(t0() + Duration::seconds(10)).await;
  assert!(report.hearts_refreshed);
  assert_eq!(api.fetch_hearts_count(), 2);

  // the stub re-anchored the countdown; no further fetch right away
  session.tick(t0() + Duration::seconds(11)).await;
  session.tick(t0() + Duration::seconds(12)).await;
  assert_eq!(api.fetch_hearts_count(), 2);
}

#[tokio::test]
async fn safety_net_poll_runs_at_the_configured_interval() {
  let api = Arc::new(InMemoryLearningApi::new());
  let course = quiz_course(&api);
  let config = SessionConfig { poll_interval_secs: 30, ..SessionConfig::default() };
  let mut session = LessonSession::open(api.clone(), config, course, t0()).await.expect("open");
  assert_eq!(api.fetch_hearts_count(), 1);

  session.tick(t0() + Duration::seconds(29)).await;
  assert_eq!(api.fetch_hearts_count(), 1);

  let report = session.tick(t0() + Duration::seconds(30)).await;
  assert!(report.hearts_refreshed);
  assert_eq!(api.fetch_hearts_count(), 2);

  // the interval restarts from the poll
  session.tick(t0() + Duration::seconds(45)).await;
  assert_eq!(api.fetch_hearts_count(), 2);
  session.tick(t0() + Duration::seconds(60)).await;
  assert_eq!(api.fetch_hearts_count(), 3);
}

#[tokio::test]
async fn countdown_refresh_is_skipped_right_after_a_poll() {
  // countdown and poll land on the same instant: only one request goes out
  let api = Arc::new(InMemoryLearningApi::with_hearts(4, 5, 30));
  let course = quiz_course(&api);
  let config = SessionConfig { poll_interval_secs: 30, ..SessionConfig::default() };
  let mut session = LessonSession::open(api.clone(), config, course, t0()).await.expect("open");

  let report = session.tick(t0() + Duration::seconds(30)).await;
  assert!(report.hearts_refreshed);
  assert_eq!(api.fetch_hearts_count(), 2);
}
