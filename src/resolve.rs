//! Index, time and event resolution.
//!
//! Pure queries translating between sample index, time value and named
//! event occurrence. Nothing here mutates the series.
//!
//! `before`/`after` queries require a strictly increasing time vector;
//! the closest-sample query only needs a valid one. Failures are
//! reported as named errors rather than sentinel values so callers can
//! distinguish "no such event" from "outside the sampled span".

use crate::error::{Result, TimeSeriesError};
use crate::timeseries::TimeSeries;

impl TimeSeries {
    /// Index of the sample closest to `time` (ties resolved toward the
    /// earlier sample).
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EmptyTime`] on an empty series or
    /// [`TimeSeriesError::InvalidTime`] on a NaN/duplicate time vector.
    pub fn index_at_time(&self, time: f64) -> Result<usize> {
        self.check_valid_time()?;
        self.check_not_empty_time()?;
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for (i, t) in self.time().iter().enumerate() {
            let diff = (t - time).abs();
            if diff < best_diff {
                best_diff = diff;
                best = i;
            }
        }
        Ok(best)
    }

    /// Index of the nearest sample strictly before `time`, or at-or-
    /// before when `inclusive` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::OutOfRange`] if no such sample
    /// exists, or [`TimeSeriesError::UnorderedTime`] if the time vector
    /// is not strictly increasing.
    pub fn index_before_time(&self, time: f64, inclusive: bool) -> Result<usize> {
        self.check_increasing_time()?;
        self.check_not_empty_time()?;
        let count = if inclusive {
            self.time().partition_point(|t| *t <= time)
        } else {
            self.time().partition_point(|t| *t < time)
        };
        if count == 0 {
            return Err(TimeSeriesError::out_of_range(format!(
                "no sample before time {time}"
            )));
        }
        Ok(count - 1)
    }

    /// Index of the nearest sample strictly after `time`, or at-or-
    /// after when `inclusive` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::OutOfRange`] if no such sample
    /// exists, or [`TimeSeriesError::UnorderedTime`] if the time vector
    /// is not strictly increasing.
    pub fn index_after_time(&self, time: f64, inclusive: bool) -> Result<usize> {
        self.check_increasing_time()?;
        self.check_not_empty_time()?;
        let index = if inclusive {
            self.time().partition_point(|t| *t < time)
        } else {
            self.time().partition_point(|t| *t <= time)
        };
        if index >= self.len() {
            return Err(TimeSeriesError::out_of_range(format!(
                "no sample after time {time}"
            )));
        }
        Ok(index)
    }

    /// Time of the nth occurrence of an event (occurrences are ordered
    /// by time, starting at 0).
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EventNotFound`] if the occurrence
    /// does not exist.
    pub fn event_time(&self, name: &str, occurrence: usize) -> Result<f64> {
        let index = self
            .nth_event_index(name, occurrence)
            .ok_or_else(|| TimeSeriesError::event_not_found(name, occurrence))?;
        Ok(self.events()[index].time)
    }

    /// Index of the sample closest to the given event occurrence.
    ///
    /// # Errors
    ///
    /// Propagates the event and time resolution errors.
    pub fn index_at_event(&self, name: &str, occurrence: usize) -> Result<usize> {
        let time = self.event_time(name, occurrence)?;
        self.index_at_time(time)
    }

    /// Index bounding a "before this event" range.
    ///
    /// With `inclusive` unset this is the nearest sample strictly
    /// before the event time. With `inclusive` set, the returned index
    /// is at-or-after the event time, so that a slice ending at this
    /// index contains the event.
    ///
    /// # Errors
    ///
    /// Propagates the event and time resolution errors.
    pub fn index_before_event(&self, name: &str, occurrence: usize, inclusive: bool) -> Result<usize> {
        let time = self.event_time(name, occurrence)?;
        if inclusive {
            self.index_after_time(time, true)
        } else {
            self.index_before_time(time, false)
        }
    }

    /// Index bounding an "after this event" range.
    ///
    /// With `inclusive` unset this is the nearest sample strictly after
    /// the event time. With `inclusive` set, the returned index is
    /// at-or-before the event time, so that a slice starting at this
    /// index contains the event.
    ///
    /// # Errors
    ///
    /// Propagates the event and time resolution errors.
    pub fn index_after_event(&self, name: &str, occurrence: usize, inclusive: bool) -> Result<usize> {
        let time = self.event_time(name, occurrence)?;
        if inclusive {
            self.index_before_time(time, true)
        } else {
            self.index_after_time(time, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_steps() -> TimeSeries {
        TimeSeries::from_time(vec![0.0, 0.5, 1.0, 1.5, 2.0])
    }

    #[test]
    fn test_index_at_time() {
        let ts = half_steps();
        assert_eq!(ts.index_at_time(0.9).unwrap(), 2);
        assert_eq!(ts.index_at_time(1.0).unwrap(), 2);
        assert_eq!(ts.index_at_time(1.1).unwrap(), 2);
        assert!(TimeSeries::new().index_at_time(0.0).is_err());
    }

    #[test]
    fn test_index_before_time() {
        let ts = half_steps();
        assert_eq!(ts.index_before_time(0.9, false).unwrap(), 1);
        assert_eq!(ts.index_before_time(1.0, false).unwrap(), 1);
        assert_eq!(ts.index_before_time(1.0, true).unwrap(), 2);
        assert_eq!(ts.index_before_time(1.1, false).unwrap(), 2);
        assert!(matches!(
            ts.index_before_time(-1.0, false),
            Err(TimeSeriesError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_index_after_time() {
        let ts = half_steps();
        assert_eq!(ts.index_after_time(0.9, false).unwrap(), 2);
        assert_eq!(ts.index_after_time(1.0, false).unwrap(), 3);
        assert_eq!(ts.index_after_time(1.0, true).unwrap(), 2);
        assert_eq!(ts.index_after_time(1.1, false).unwrap(), 3);
        assert!(matches!(
            ts.index_after_time(13.0, false),
            Err(TimeSeriesError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_requires_increasing_time() {
        let ts = TimeSeries::from_time(vec![0.0, 2.0, 1.0]);
        assert!(matches!(
            ts.index_before_time(1.5, false),
            Err(TimeSeriesError::UnorderedTime)
        ));
    }

    #[test]
    fn test_event_time_by_occurrence() {
        let mut ts = TimeSeries::new();
        ts.add_event(5.5, "event1");
        ts.add_event(10.8, "event2");
        ts.add_event(2.3, "event2");

        assert_eq!(ts.event_time("event1", 0).unwrap(), 5.5);
        assert_eq!(ts.event_time("event2", 0).unwrap(), 2.3);
        assert_eq!(ts.event_time("event2", 1).unwrap(), 10.8);
        assert!(matches!(
            ts.event_time("event2", 2),
            Err(TimeSeriesError::EventNotFound { .. })
        ));
    }

    #[test]
    fn test_event_index_resolution() {
        // Scenario: events at 0.2 and 0.36 on time = arange(10)/10.
        let mut ts = TimeSeries::from_time((0..10).map(|i| f64::from(i) / 10.0).collect());
        ts.add_event(0.2, "event");
        ts.add_event(0.36, "event");

        assert_eq!(ts.index_before_event("event", 1, false).unwrap(), 3);
        assert_eq!(ts.index_after_event("event", 1, true).unwrap(), 3);
        assert_eq!(ts.index_after_event("event", 1, false).unwrap(), 4);
        assert_eq!(ts.index_before_event("event", 1, true).unwrap(), 4);
        assert_eq!(ts.index_at_event("event", 0).unwrap(), 2);
    }
}
