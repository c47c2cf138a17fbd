use lesson_flow::position::{PositionState, PositionTracker};

#[test]
fn resume_with_saved_index_in_range() {
  let mut tracker = PositionTracker::new();
  assert!(tracker.initialize(5, Some(3), &[true, true, true, false, false]));
  assert_eq!(tracker.current_index(), Some(3));
  // progress shown as 3/5 (60%)
  assert_eq!(tracker.progress(), (3, 5));
  assert_eq!(tracker.progress_percent(), 60);
}

#[test]
fn resume_with_saved_index_beyond_length_is_complete() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(5, Some(5), &[true; 5]);
  assert!(tracker.is_complete());
  assert_eq!(tracker.save_index(), Some(5));
  assert_eq!(tracker.progress_percent(), 100);
}

#[test]
fn resume_without_saved_index_picks_first_pending_step() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(4, None, &[true, true, false, false]);
  assert_eq!(tracker.current_index(), Some(2));
}

#[test]
fn resume_without_saved_index_and_all_complete_starts_at_zero() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(3, None, &[true, true, true]);
  assert_eq!(tracker.current_index(), Some(0));
}

#[test]
fn empty_flow_initializes_complete() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(0, None, &[]);
  assert!(tracker.is_complete());
  assert_eq!(tracker.save_index(), Some(0));
}

#[test]
fn initialization_runs_exactly_once() {
  let mut tracker = PositionTracker::new();
  assert!(tracker.initialize(5, Some(2), &[false; 5]));
  // a background content re-fetch must not silently move the learner
  assert!(!tracker.initialize(5, Some(4), &[false; 5]));
  assert_eq!(tracker.current_index(), Some(2));
}

#[test]
fn advance_is_monotonic_by_exactly_one() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(3, Some(0), &[false; 3]);

  assert_eq!(tracker.advance().expect("advance"), PositionState::InProgress { index: 1 });
  assert_eq!(tracker.advance().expect("advance"), PositionState::InProgress { index: 2 });
  // completing the last step transitions to Complete, not to index 3
  assert_eq!(tracker.advance().expect("advance"), PositionState::Complete);
  assert_eq!(tracker.save_index(), Some(3));

  // advancing past Complete is an error, never a wraparound
  assert!(tracker.advance().is_err());
}

#[test]
fn advance_before_initialize_is_an_error() {
  let mut tracker = PositionTracker::new();
  assert!(tracker.advance().is_err());
}

#[test]
fn stale_saved_index_clamps_to_complete_on_rebind() {
  // flow used to have 6 steps, saved index 5; content edited down to 4
  let mut tracker = PositionTracker::new();
  tracker.initialize(6, Some(5), &[false; 6]);
  assert_eq!(tracker.current_index(), Some(5));

  tracker.rebind(4);
  assert!(tracker.is_complete());
  assert_eq!(tracker.save_index(), Some(4));
}

#[test]
fn rebind_with_index_still_in_range_keeps_position() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(6, Some(2), &[false; 6]);
  tracker.rebind(4);
  assert_eq!(tracker.current_index(), Some(2));
}

#[test]
fn completed_keys_are_ordered_and_deduplicated() {
  let mut tracker = PositionTracker::new();
  tracker.initialize(3, Some(0), &[false; 3]);
  tracker.mark_completed("sec-a");
  tracker.mark_completed("sec-b");
  tracker.mark_completed("sec-a");
  let keys: Vec<_> = tracker.completed_keys().iter().cloned().collect();
  assert_eq!(keys, vec!["sec-a".to_string(), "sec-b".to_string()]);
  assert!(tracker.is_step_completed("sec-b"));
  assert!(!tracker.is_step_completed("sec-c"));
}
