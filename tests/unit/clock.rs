use super::*;

fn ts(ms: f64) -> Timestamp {
    Timestamp::from_millis(ms)
}

#[test]
fn no_reading_before_window_closes() {
    let mut clock = FrameClock::new(PATTERN_WINDOW, ts(0.0)).unwrap();
    for i in 1..=10 {
        assert_eq!(clock.tick(ts(f64::from(i) * 40.0)), None);
    }
    assert_eq!(clock.frame_count(), 10);
    assert_eq!(clock.latest(), None);
}

#[test]
fn reading_is_rounded_rate_over_actual_elapsed() {
    let mut clock = FrameClock::new(PATTERN_WINDOW, ts(0.0)).unwrap();
    for i in 1..=29 {
        assert!(clock.tick(ts(f64::from(i) * 17.0)).is_none());
    }
    // 30 frames over 510ms -> 58.82 -> 59.
    assert_eq!(clock.tick(ts(510.0)), Some(FpsReading(59)));
    assert_eq!(clock.frame_count(), 0);
    assert_eq!(clock.window_start(), ts(510.0));
    assert_eq!(clock.latest(), Some(FpsReading(59)));
}

#[test]
fn fps_formula_holds_for_many_counts_and_windows() {
    for frames in [1u64, 7, 60, 143, 1000] {
        for d in [500.0, 512.5, 999.0, 2500.0] {
            let mut clock = FrameClock::new(PATTERN_WINDOW, ts(100.0)).unwrap();
            for _ in 1..frames {
                assert!(clock.tick(ts(101.0)).is_none());
            }
            let want = ((frames as f64) * 1000.0 / d).round() as u32;
            assert_eq!(clock.tick(ts(100.0 + d)), Some(FpsReading(want)));
            assert_eq!(clock.frame_count(), 0);
        }
    }
}

#[test]
fn consecutive_windows_do_not_share_frames() {
    let mut clock = FrameClock::new(MONITOR_WINDOW, ts(0.0)).unwrap();
    let mut readings = Vec::new();
    // 60 Hz for one second.
    for i in 1..=60 {
        let now = ts(f64::from(i) * 1000.0 / 60.0);
        if let Some(r) = clock.tick(now) {
            readings.push(r);
        }
    }
    assert!(readings.len() >= 3);
    for r in &readings {
        assert!((59..=61).contains(&r.get()), "unexpected reading {r}");
    }
}

#[test]
fn zero_window_is_rejected() {
    assert!(FrameClock::new(Duration::ZERO, ts(0.0)).is_err());
    assert!(FrameClock::with_history(MONITOR_WINDOW, 0, ts(0.0)).is_err());
}

#[test]
fn history_keeps_last_twenty_in_fifo_order() {
    let mut clock = FrameClock::with_history(MONITOR_WINDOW, MONITOR_HISTORY, ts(0.0)).unwrap();
    let mut now = 0.0;
    // Reading k has k+1 frames over 250ms -> 4*(k+1) fps.
    for k in 0..25u32 {
        for _ in 0..k {
            now += 1.0;
            assert!(clock.tick(ts(now)).is_none());
        }
        now = f64::from(k + 1) * 250.0;
        assert_eq!(clock.tick(ts(now)), Some(FpsReading(4 * (k + 1))));
    }

    let history = clock.history().unwrap();
    assert_eq!(history.len(), 20);
    let kept: Vec<u32> = history.iter().map(FpsReading::get).collect();
    let want: Vec<u32> = (5..25).map(|k| 4 * (k + 1)).collect();
    assert_eq!(kept, want);

    let mean = want.iter().sum::<u32>() as f64 / 20.0;
    assert_eq!(clock.average(), Some(FpsReading(mean.round() as u32)));
}

#[test]
fn average_rounds_to_nearest() {
    let mut h = FpsHistory::new(3).unwrap();
    assert_eq!(h.average(), None);
    h.push(FpsReading(120));
    h.push(FpsReading(121));
    assert_eq!(h.average(), Some(FpsReading(121)));
    h.push(FpsReading(119));
    assert_eq!(h.average(), Some(FpsReading(120)));
    h.push(FpsReading(0));
    assert_eq!(h.iter().collect::<Vec<_>>(), vec![FpsReading(121), FpsReading(119), FpsReading(0)]);
    assert_eq!(h.average(), Some(FpsReading(80)));
}

#[test]
fn clock_without_history_reports_no_average() {
    let mut clock = FrameClock::new(PATTERN_WINDOW, ts(0.0)).unwrap();
    clock.tick(ts(500.0));
    assert_eq!(clock.latest(), Some(FpsReading(2)));
    assert_eq!(clock.average(), None);
    assert!(clock.history().is_none());
}

#[test]
fn tiers_match_color_bands() {
    assert_eq!(FpsTier::of(144), FpsTier::Excellent);
    assert_eq!(FpsTier::of(100), FpsTier::Excellent);
    assert_eq!(FpsTier::of(99), FpsTier::Good);
    assert_eq!(FpsTier::of(60), FpsTier::Good);
    assert_eq!(FpsTier::of(30), FpsTier::Fair);
    assert_eq!(FpsTier::of(29), FpsTier::Poor);
    assert_eq!(FpsReading(0).tier().color(), "#ff0000");
    assert_eq!(FpsTier::Excellent.color(), "#00ff00");
}
