use super::*;

#[test]
fn manual_handles_are_unique_and_fire_in_order() {
    let mut s = ManualScheduler::new();
    let a = s.request_frame();
    let b = s.request_frame();
    let c = s.request_frame();
    assert!(a < b && b < c);
    assert_eq!(s.pending_count(), 3);

    assert!(s.cancel_frame(b));
    assert!(!s.cancel_frame(b));
    assert!(!s.is_pending(b));
    assert_eq!(s.canceled_count(), 1);

    assert_eq!(s.fire(), vec![a, c]);
    assert_eq!(s.pending_count(), 0);
    assert!(!s.cancel_frame(a));
    assert!(s.fire().is_empty());
}

#[test]
fn interval_rejects_bad_rates() {
    assert!(IntervalScheduler::new(0.0, Timestamp::ZERO).is_err());
    assert!(IntervalScheduler::new(-60.0, Timestamp::ZERO).is_err());
    assert!(IntervalScheduler::new(f64::NAN, Timestamp::ZERO).is_err());
}

#[test]
fn interval_fires_only_at_deadlines() {
    let mut s = IntervalScheduler::new(100.0, Timestamp::ZERO).unwrap();
    assert_eq!(s.period_ms(), 10.0);
    assert_eq!(s.next_deadline(), Timestamp::from_millis(10.0));

    let h = s.request_frame();
    assert!(s.fire_due(Timestamp::from_millis(9.0)).is_empty());
    assert_eq!(s.fire_due(Timestamp::from_millis(10.0)), vec![h]);
    assert_eq!(s.next_deadline(), Timestamp::from_millis(20.0));
    assert_eq!(s.pending_count(), 0);
}

#[test]
fn interval_skips_missed_deadlines() {
    let mut s = IntervalScheduler::new(100.0, Timestamp::ZERO).unwrap();
    let h = s.request_frame();
    // Arrive 35ms late for the 10ms deadline.
    assert_eq!(s.fire_due(Timestamp::from_millis(45.0)), vec![h]);
    assert_eq!(s.skipped_deadlines(), 3);
    assert_eq!(s.next_deadline(), Timestamp::from_millis(50.0));
}

#[test]
fn interval_canceled_handle_does_not_fire() {
    let mut s = IntervalScheduler::new(60.0, Timestamp::ZERO).unwrap();
    let h = s.request_frame();
    assert!(s.cancel_frame(h));
    assert!(s.fire_due(Timestamp::from_millis(100.0)).is_empty());
}
