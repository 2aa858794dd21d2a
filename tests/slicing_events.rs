//! Event resolution and slicing across module boundaries.

use motion_timeseries::{Channel, TimeSeries};

fn tenths_with_events() -> TimeSeries {
    let mut ts = TimeSeries::from_time((0..10).map(|i| f64::from(i) / 10.0).collect());
    ts.add_channel(
        "signal",
        Channel::from_vec((0..10).map(f64::from).collect()),
        false,
    )
    .unwrap();
    ts.add_event(0.2, "event");
    ts.add_event(0.36, "event");
    ts
}

#[test]
fn test_event_occurrence_resolution() {
    let ts = tenths_with_events();

    // Occurrence 1 sits at t = 0.36, between samples 3 (0.3) and 4 (0.4).
    assert_eq!(ts.index_before_event("event", 1, false).unwrap(), 3);
    assert_eq!(ts.index_after_event("event", 1, true).unwrap(), 3);
    assert_eq!(ts.index_after_event("event", 1, false).unwrap(), 4);
    assert_eq!(ts.index_at_event("event", 1).unwrap(), 4);
}

#[test]
fn test_event_slices_bracket_the_event() {
    let ts = tenths_with_events();

    // Inclusive slices must contain the event time inside their span.
    let before = ts.ts_before_event("event", 1, true).unwrap();
    assert!(*before.time().last().unwrap() >= 0.36);

    let after = ts.ts_after_event("event", 1, true).unwrap();
    assert!(after.time()[0] <= 0.36);

    // Exclusive slices stay strictly clear of it.
    let before = ts.ts_before_event("event", 1, false).unwrap();
    assert!(*before.time().last().unwrap() < 0.36);

    let after = ts.ts_after_event("event", 1, false).unwrap();
    assert!(after.time()[0] > 0.36);
}

#[test]
fn test_half_open_cycle_extraction_tiles_exactly() {
    // Adjacent cycles cut with (true, false) then a final (true, true)
    // reconstruct the original channel with no duplicated or dropped
    // sample.
    let mut ts = TimeSeries::from_time((0..30).map(|i| f64::from(i) / 10.0).collect());
    ts.add_channel(
        "signal",
        Channel::from_vec((0..30).map(f64::from).collect()),
        false,
    )
    .unwrap();
    ts.add_event(0.0, "cycle");
    ts.add_event(1.0, "cycle");
    ts.add_event(2.0, "cycle");

    let mut rebuilt: Vec<f64> = Vec::new();
    for occurrence in 0..2 {
        let i1 = ts.index_at_event("cycle", occurrence).unwrap();
        let i2 = ts.index_at_event("cycle", occurrence + 1).unwrap();
        let cycle = ts.ts_between_indexes(i1, i2, (true, false)).unwrap();
        rebuilt.extend_from_slice(cycle.channel("signal").unwrap().values());
    }
    let last = ts.index_at_event("cycle", 2).unwrap();
    let tail = ts.ts_between_indexes(last, ts.len() - 1, (true, true)).unwrap();
    rebuilt.extend_from_slice(tail.channel("signal").unwrap().values());

    assert_eq!(rebuilt, ts.channel("signal").unwrap().values());
}

#[test]
fn test_slices_are_independent() {
    let mut ts = tenths_with_events();
    let sliced = ts.ts_between_indexes(2, 5, true).unwrap();
    ts.add_channel("signal", Channel::from_vec(vec![0.0; 10]), true)
        .unwrap();
    assert_eq!(
        sliced.channel("signal").unwrap().values(),
        &[2.0, 3.0, 4.0, 5.0]
    );
}

#[test]
fn test_events_stay_sorted_through_mutations() {
    let mut ts = TimeSeries::from_time((0..100).map(|i| f64::from(i) / 10.0).collect());
    ts.add_event(5.0, "b");
    ts.add_event(1.0, "a");
    ts.add_event(3.0, "c");
    ts.rename_event("c", "a", None).unwrap();
    ts.remove_event("b", 0).unwrap();
    ts.add_event(0.5, "d");

    let times: Vec<f64> = ts.events().iter().map(|e| e.time).collect();
    let mut sorted = times.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(times, sorted);
}

#[test]
fn test_remove_duplicate_events_is_idempotent() {
    let mut ts = TimeSeries::from_time((0..10).map(f64::from).collect());
    ts.add_event(1.0, "push");
    ts.add_event(1.0, "push");
    ts.add_event(1.0 + 1e-12, "push");
    ts.add_event(2.0, "push");

    ts.remove_duplicate_events();
    assert_eq!(ts.count_events("push"), 2);
    let once = ts.events().to_vec();
    ts.remove_duplicate_events();
    assert_eq!(ts.events(), &once[..]);
}

#[test]
fn test_shift_and_sync_preserve_slicing() {
    let mut ts = tenths_with_events();
    ts.sync_event("event", 0).unwrap();

    // Event 0 is now at time zero; sample times moved with it.
    assert_eq!(ts.events()[0].time, 0.0);
    let after = ts.ts_after_event("event", 0, true).unwrap();
    assert!((after.time()[0] - 0.0).abs() < 1e-12);
    assert_eq!(after.len(), 8);
}
