//! Plain-data records for the serialization boundary.
//!
//! A [`TimeSeriesRecord`] is the dumb-struct image of a series: flat
//! channel values with explicit shapes, events as `(time, name)` pairs
//! and the nested metadata map. With the `serde` feature enabled the
//! record types derive `Serialize`/`Deserialize`, so any serde format
//! can carry a series across a process boundary. Converting back
//! validates shapes and re-sorts events; the in-memory invariants
//! never depend on what a file claimed.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelStore};
use crate::error::Result;
use crate::event::Event;
use crate::info::{InfoStore, InfoValue};
use crate::timeseries::TimeSeries;

/// One event as plain data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRecord {
    pub time: f64,
    pub name: String,
}

/// One channel as plain data: flat row-major values plus shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelRecord {
    pub name: String,
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

/// A whole series as plain data.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeriesRecord {
    pub time: Vec<f64>,
    pub data: Vec<ChannelRecord>,
    pub events: Vec<EventRecord>,
    pub info: BTreeMap<String, BTreeMap<String, InfoValue>>,
}

impl TimeSeries {
    /// Snapshot the series as plain data.
    #[must_use]
    pub fn to_record(&self) -> TimeSeriesRecord {
        let data = self
            .data()
            .iter()
            .map(|(name, channel)| ChannelRecord {
                name: name.to_string(),
                shape: channel.shape().to_vec(),
                values: channel.values().to_vec(),
            })
            .collect();
        let events = self
            .events()
            .iter()
            .map(|e| EventRecord {
                time: e.time,
                name: e.name.clone(),
            })
            .collect();
        let mut info: BTreeMap<String, BTreeMap<String, InfoValue>> = BTreeMap::new();
        for (subject, key, value) in self.info().iter() {
            info.entry(subject.to_string())
                .or_default()
                .insert(key.to_string(), value.clone());
        }
        TimeSeriesRecord {
            time: self.time().to_vec(),
            data,
            events,
            info,
        }
    }

    /// Rebuild a series from plain data, validating channel shapes and
    /// re-sorting events.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TimeSeriesError::InvalidArgument`] for a shape
    /// that does not match its values, or
    /// [`crate::TimeSeriesError::ShapeMismatch`] for a channel whose
    /// leading dimension differs from the time vector's length.
    pub fn from_record(record: TimeSeriesRecord) -> Result<TimeSeries> {
        let mut data = ChannelStore::new();
        for channel in record.data {
            let parsed = Channel::new(channel.values, channel.shape)?;
            if parsed.len() != record.time.len() {
                return Err(crate::TimeSeriesError::shape_mismatch(
                    &channel.name,
                    record.time.len(),
                    parsed.len(),
                ));
            }
            data.insert(channel.name, parsed);
        }
        let events: Vec<Event> = record
            .events
            .into_iter()
            .map(|e| Event::new(e.time, e.name))
            .collect();
        let mut info = InfoStore::new();
        for (subject, inner) in record.info {
            for (key, value) in inner {
                info.set(subject.clone(), key, value);
            }
        }
        let ts = TimeSeries::from_components(record.time, data, events, info);
        ts.check_well_shaped()?;
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimeSeries {
        let mut ts = TimeSeries::from_time((0..4).map(f64::from).collect());
        ts.add_channel(
            "pose",
            Channel::new((0..8).map(f64::from).collect(), vec![4, 2]).unwrap(),
            false,
        )
        .unwrap();
        ts.add_event(2.0, "mark");
        ts.add_info("pose", "Unit", "m", false).unwrap();
        ts
    }

    #[test]
    fn test_record_round_trip() {
        let ts = sample();
        let rebuilt = TimeSeries::from_record(ts.to_record()).unwrap();
        assert_eq!(ts, rebuilt);
    }

    #[test]
    fn test_from_record_sorts_events() {
        let mut record = sample().to_record();
        record.events.insert(
            0,
            EventRecord {
                time: 9.0,
                name: "late".to_string(),
            },
        );
        let rebuilt = TimeSeries::from_record(record).unwrap();
        let times: Vec<f64> = rebuilt.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![2.0, 9.0]);
    }

    #[test]
    fn test_from_record_validates_shapes() {
        let mut bad = sample().to_record();
        bad.data[0].shape = vec![3, 2];
        assert!(TimeSeries::from_record(bad).is_err());

        let mut short = sample().to_record();
        short.data[0].shape = vec![2, 2];
        short.data[0].values.truncate(4);
        assert!(matches!(
            TimeSeries::from_record(short),
            Err(crate::TimeSeriesError::ShapeMismatch { .. })
        ));
    }
}
