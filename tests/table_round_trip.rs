//! Round-trips through the table and record boundaries.

use motion_timeseries::{Channel, Table, TimeSeries};

fn marker_trial() -> TimeSeries {
    let n = 5;
    let mut ts = TimeSeries::from_time((0..n).map(|i| f64::from(i) / 100.0).collect());
    // A marker trajectory: (n, 4) homogeneous coordinates, with one
    // occluded frame.
    let mut values: Vec<f64> = (0..n * 4).map(f64::from).collect();
    for v in &mut values[8..12] {
        *v = f64::NAN;
    }
    ts.add_channel(
        "Marker1",
        Channel::new(values, vec![n as usize, 4]).unwrap(),
        false,
    )
    .unwrap();
    ts.add_channel(
        "EMG1",
        Channel::from_vec((0..n).map(|i| f64::from(i) * 0.5).collect()),
        false,
    )
    .unwrap();
    ts.add_event(0.02, "contact");
    ts.add_info("Marker1", "Unit", "m", false).unwrap();
    ts
}

#[test]
fn test_table_round_trip_preserves_channels() {
    let ts = marker_trial();
    let table = ts.to_table().unwrap();

    // Shaped channels flatten to bracket-suffixed columns.
    assert!(table.column("Marker1[0]").is_some());
    assert!(table.column("Marker1[3]").is_some());
    assert!(table.column("EMG1").is_some());
    assert_eq!(table.index(), ts.time());

    let folded = TimeSeries::from_table(&table).unwrap();
    assert_eq!(folded.time(), ts.time());
    assert!(folded
        .channel("Marker1")
        .unwrap()
        .eq_nan(ts.channel("Marker1").unwrap()));
    assert!(folded
        .channel("EMG1")
        .unwrap()
        .eq_nan(ts.channel("EMG1").unwrap()));
}

#[test]
fn test_table_to_series_with_sparse_components() {
    let mut table = Table::new(vec![0.0, 0.01]);
    table.add_column("Pose[0,0]", vec![1.0, 1.0]).unwrap();
    table.add_column("Pose[1,1]", vec![1.0, 1.0]).unwrap();

    let ts = TimeSeries::from_table(&table).unwrap();
    let pose = ts.channel("Pose").unwrap();
    assert_eq!(pose.shape(), &[2, 2, 2]);
    assert_eq!(pose.row(0)[0], 1.0);
    assert!(pose.row(0)[1].is_nan());
    assert!(pose.row(0)[2].is_nan());
    assert_eq!(pose.row(0)[3], 1.0);
}

#[test]
fn test_record_round_trip_preserves_everything() {
    let ts = marker_trial();
    let record = ts.to_record();

    assert_eq!(record.time, ts.time());
    assert_eq!(record.data.len(), 2);
    assert_eq!(record.events.len(), 1);
    assert!(record.info.contains_key("Time"));
    assert!(record.info.contains_key("Marker1"));

    let rebuilt = TimeSeries::from_record(record).unwrap();
    assert_eq!(rebuilt, ts);
}

#[test]
fn test_from_record_rejects_inconsistent_shapes() {
    let mut record = marker_trial().to_record();
    record.time.pop();
    assert!(TimeSeries::from_record(record).is_err());
}
