//! Slicing: restricting a series to an index, time or event range.
//!
//! Every slice is a new, independent series carrying the restricted
//! time vector, all channels and the metadata, but no events. Events
//! are caller-managed at this layer: cycle extraction and friends
//! re-add the events they care about on the new time base.
//!
//! Inclusivity can be applied per bound. Cycle extraction relies on
//! `(true, false)` half-open slices so adjacent cycles never
//! double-count their shared boundary sample.

use crate::channel::ChannelStore;
use crate::error::{Result, TimeSeriesError};
use crate::timeseries::TimeSeries;

/// Per-bound inclusivity for range slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inclusivity {
    /// Whether the lower bound is part of the range.
    pub lower: bool,
    /// Whether the upper bound is part of the range.
    pub upper: bool,
}

impl Inclusivity {
    /// Asymmetric inclusivity.
    #[must_use]
    pub const fn new(lower: bool, upper: bool) -> Self {
        Self { lower, upper }
    }

    /// Both bounds included.
    #[must_use]
    pub const fn both() -> Self {
        Self::new(true, true)
    }

    /// Neither bound included.
    #[must_use]
    pub const fn neither() -> Self {
        Self::new(false, false)
    }
}

impl From<bool> for Inclusivity {
    /// A single flag applies symmetrically to both bounds.
    fn from(flag: bool) -> Self {
        Self::new(flag, flag)
    }
}

impl From<(bool, bool)> for Inclusivity {
    fn from((lower, upper): (bool, bool)) -> Self {
        Self::new(lower, upper)
    }
}

impl TimeSeries {
    /// A new series restricted to the samples between two indexes.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] on reversed bounds,
    /// [`TimeSeriesError::OutOfRange`] on an out-of-range index, and
    /// shape/time errors if the series is not well-shaped.
    pub fn ts_between_indexes(
        &self,
        index1: usize,
        index2: usize,
        inclusive: impl Into<Inclusivity>,
    ) -> Result<TimeSeries> {
        self.check_well_shaped()?;
        if index2 < index1 {
            return Err(TimeSeriesError::invalid_argument(format!(
                "index2 ({index2}) must not be lower than index1 ({index1})"
            )));
        }
        if index2 >= self.len() {
            return Err(TimeSeriesError::out_of_range(format!(
                "index {index2} exceeds the {} samples of the series",
                self.len()
            )));
        }
        let inclusive = inclusive.into();
        let start = index1 + usize::from(!inclusive.lower);
        let end = if inclusive.upper { index2 + 1 } else { index2 };
        let end = end.max(start);

        let mut data = ChannelStore::new();
        for (key, channel) in self.data().iter() {
            data.insert(key, channel.slice_rows(start, end));
        }
        Ok(TimeSeries::from_components(
            self.time()[start..end].to_vec(),
            data,
            Vec::new(),
            self.info().clone(),
        ))
    }

    /// A new series keeping the samples before the given index.
    ///
    /// # Errors
    ///
    /// See [`TimeSeries::ts_between_indexes`].
    pub fn ts_before_index(&self, index: usize, inclusive: bool) -> Result<TimeSeries> {
        self.ts_between_indexes(0, index, (true, inclusive))
    }

    /// A new series keeping the samples after the given index.
    ///
    /// # Errors
    ///
    /// See [`TimeSeries::ts_between_indexes`].
    pub fn ts_after_index(&self, index: usize, inclusive: bool) -> Result<TimeSeries> {
        self.check_not_empty_time()?;
        self.ts_between_indexes(index, self.len() - 1, (inclusive, true))
    }

    /// A new series keeping the samples at a single index.
    ///
    /// # Errors
    ///
    /// See [`TimeSeries::ts_between_indexes`].
    pub fn ts_at_index(&self, index: usize) -> Result<TimeSeries> {
        self.ts_between_indexes(index, index, true)
    }

    /// A one-sample series at the time closest to `time`.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_at_time(&self, time: f64) -> Result<TimeSeries> {
        let index = self.index_at_time(time)?;
        self.ts_at_index(index)
    }

    /// A one-sample series at the time closest to an event occurrence.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_at_event(&self, name: &str, occurrence: usize) -> Result<TimeSeries> {
        let index = self.index_at_event(name, occurrence)?;
        self.ts_at_index(index)
    }

    /// A new series keeping the samples before `time`.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_before_time(&self, time: f64, inclusive: bool) -> Result<TimeSeries> {
        let index = self.index_before_time(time, inclusive)?;
        self.ts_before_index(index, true)
    }

    /// A new series keeping the samples after `time`. With `inclusive`
    /// set, the sample bracketing `time` from below is kept so the
    /// requested time lies inside the returned span.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_after_time(&self, time: f64, inclusive: bool) -> Result<TimeSeries> {
        let index = if inclusive {
            self.index_before_time(time, true)?
        } else {
            self.index_after_time(time, false)?
        };
        self.ts_after_index(index, true)
    }

    /// A new series keeping the samples between two times.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] when
    /// `time2 < time1`; otherwise propagates resolution and slicing
    /// errors.
    pub fn ts_between_times(
        &self,
        time1: f64,
        time2: f64,
        inclusive: impl Into<Inclusivity>,
    ) -> Result<TimeSeries> {
        if time2 < time1 {
            return Err(TimeSeriesError::invalid_argument(format!(
                "time2 ({time2}) must not be lower than time1 ({time1})"
            )));
        }
        let inclusive = inclusive.into();
        let index1 = if inclusive.lower {
            self.index_before_time(time1, true)?
        } else {
            self.index_after_time(time1, false)?
        };
        let index2 = if inclusive.upper {
            self.index_after_time(time2, true)?
        } else {
            self.index_before_time(time2, false)?
        };
        self.ts_between_indexes(index1, index2, true)
    }

    /// A new series keeping the samples before an event occurrence.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_before_event(
        &self,
        name: &str,
        occurrence: usize,
        inclusive: bool,
    ) -> Result<TimeSeries> {
        let index = self.index_before_event(name, occurrence, inclusive)?;
        self.ts_before_index(index, true)
    }

    /// A new series keeping the samples after an event occurrence.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_after_event(
        &self,
        name: &str,
        occurrence: usize,
        inclusive: bool,
    ) -> Result<TimeSeries> {
        let index = self.index_after_event(name, occurrence, inclusive)?;
        self.ts_after_index(index, true)
    }

    /// A new series keeping the samples between two event occurrences.
    ///
    /// # Errors
    ///
    /// Propagates resolution and slicing errors.
    pub fn ts_between_events(
        &self,
        name1: &str,
        occurrence1: usize,
        name2: &str,
        occurrence2: usize,
        inclusive: impl Into<Inclusivity>,
    ) -> Result<TimeSeries> {
        let inclusive = inclusive.into();
        let index1 = self.index_after_event(name1, occurrence1, inclusive.lower)?;
        let index2 = self.index_before_event(name2, occurrence2, inclusive.upper)?;
        self.ts_between_indexes(index1, index2, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    fn tenth_steps() -> TimeSeries {
        let mut ts = TimeSeries::from_time((0..10).map(|i| f64::from(i) / 10.0).collect());
        ts.add_channel(
            "signal",
            Channel::from_vec((0..10).map(f64::from).collect()),
            false,
        )
        .unwrap();
        ts
    }

    #[test]
    fn test_between_indexes() {
        let ts = tenth_steps();
        let sliced = ts.ts_between_indexes(2, 5, false).unwrap();
        assert_eq!(sliced.time(), &[0.3, 0.4]);
        let sliced = ts.ts_between_indexes(2, 5, true).unwrap();
        assert_eq!(sliced.time(), &[0.2, 0.3, 0.4, 0.5]);
        assert_eq!(
            sliced.channel("signal").unwrap().values(),
            &[2.0, 3.0, 4.0, 5.0]
        );
    }

    #[test]
    fn test_between_indexes_errors() {
        let ts = tenth_steps();
        assert!(matches!(
            ts.ts_between_indexes(5, 2, true),
            Err(TimeSeriesError::InvalidArgument(_))
        ));
        assert!(matches!(
            ts.ts_between_indexes(2, 99, true),
            Err(TimeSeriesError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_slices_drop_events_keep_info() {
        let mut ts = tenth_steps();
        ts.add_event(0.4, "mark");
        ts.add_info("signal", "Unit", "V", false).unwrap();
        let sliced = ts.ts_between_indexes(0, 5, true).unwrap();
        assert!(sliced.events().is_empty());
        assert!(sliced.info().get("signal", "Unit").is_some());
    }

    #[test]
    fn test_before_after_index() {
        let ts = tenth_steps();
        assert_eq!(ts.ts_before_index(2, false).unwrap().time(), &[0.0, 0.1]);
        assert_eq!(
            ts.ts_before_index(2, true).unwrap().time(),
            &[0.0, 0.1, 0.2]
        );
        assert_eq!(
            ts.ts_after_index(7, false).unwrap().time(),
            &[0.8, 0.9]
        );
        assert_eq!(
            ts.ts_after_index(7, true).unwrap().time(),
            &[0.7, 0.8, 0.9]
        );
    }

    #[test]
    fn test_before_after_time() {
        let ts = tenth_steps();
        assert_eq!(
            ts.ts_before_time(0.3, false).unwrap().time(),
            &[0.0, 0.1, 0.2]
        );
        assert_eq!(
            ts.ts_before_time(0.3, true).unwrap().time(),
            &[0.0, 0.1, 0.2, 0.3]
        );
        assert_eq!(ts.ts_after_time(0.7, false).unwrap().time(), &[0.8, 0.9]);
        assert_eq!(
            ts.ts_after_time(0.7, true).unwrap().time(),
            &[0.7, 0.8, 0.9]
        );
    }

    #[test]
    fn test_between_times() {
        let ts = tenth_steps();
        assert_eq!(
            ts.ts_between_times(0.2, 0.5, false).unwrap().time(),
            &[0.3, 0.4]
        );
        assert_eq!(
            ts.ts_between_times(0.2, 0.5, true).unwrap().time(),
            &[0.2, 0.3, 0.4, 0.5]
        );
        assert!(matches!(
            ts.ts_between_times(0.5, 0.2, true),
            Err(TimeSeriesError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_event_slicing() {
        let mut ts = tenth_steps();
        ts.add_event(0.2, "event");
        ts.add_event(0.35, "event");

        assert_eq!(
            ts.ts_before_event("event", 0, false).unwrap().time(),
            &[0.0, 0.1]
        );
        assert_eq!(
            ts.ts_before_event("event", 0, true).unwrap().time(),
            &[0.0, 0.1, 0.2]
        );
        assert_eq!(
            ts.ts_after_event("event", 1, false).unwrap().time(),
            &[0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
        );
        assert_eq!(
            ts.ts_after_event("event", 1, true).unwrap().time(),
            &[0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
        );
    }

    #[test]
    fn test_between_events() {
        let mut ts = tenth_steps();
        ts.add_event(0.2, "event");
        ts.add_event(0.55, "event");

        assert_eq!(
            ts.ts_between_events("event", 0, "event", 1, false)
                .unwrap()
                .time(),
            &[0.3, 0.4, 0.5]
        );
        assert_eq!(
            ts.ts_between_events("event", 0, "event", 1, true)
                .unwrap()
                .time(),
            &[0.2, 0.3, 0.4, 0.5, 0.6]
        );
    }

    #[test]
    fn test_half_open_slices_tile_exactly() {
        let ts = tenth_steps();
        let left = ts.ts_between_indexes(0, 4, (true, false)).unwrap();
        let right = ts.ts_between_indexes(4, 9, (true, true)).unwrap();
        let mut rebuilt: Vec<f64> = left.channel("signal").unwrap().values().to_vec();
        rebuilt.extend_from_slice(right.channel("signal").unwrap().values());
        assert_eq!(rebuilt, ts.channel("signal").unwrap().values());
    }

    #[test]
    fn test_at_time_and_at_event() {
        let mut ts = tenth_steps();
        ts.add_event(0.42, "mark");
        let at = ts.ts_at_time(0.41).unwrap();
        assert_eq!(at.time(), &[0.4]);
        let at = ts.ts_at_event("mark", 0).unwrap();
        assert_eq!(at.time(), &[0.4]);
    }
}
