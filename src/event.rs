//! Events attached to a time series.
//!
//! An [`Event`] is a named point in time. Events are not tied to any
//! particular channel; they mark moments of interest (heel strikes,
//! push starts, sync pulses) that slicing and cycle extraction key on.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing event times for identity.
///
/// Two events with the same name whose times differ by no more than
/// this value are considered the same event. The value sits safely
/// below any realistic sampling period (motion capture tops out around
/// 10 kHz) while staying above f64 roundoff for session-length
/// timestamps.
pub const EVENT_TIME_TOLERANCE: f64 = 1e-9;

/// A named point in time.
///
/// Events are ordered by time; collections of events in a
/// [`TimeSeries`](crate::TimeSeries) are always kept sorted ascending,
/// with insertion order preserved among ties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// The time at which the event happened, in the time vector's unit.
    pub time: f64,
    /// The name of the event.
    pub name: String,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(time: f64, name: impl Into<String>) -> Self {
        Self {
            time,
            name: name.into(),
        }
    }

    /// Whether this event is the same as another, using the time
    /// closeness tolerance rather than exact float equality.
    #[must_use]
    pub fn is_same(&self, other: &Event) -> bool {
        (self.time - other.time).abs() <= EVENT_TIME_TOLERANCE && self.name == other.name
    }
}

/// Sort events ascending by time, keeping insertion order among ties.
pub(crate) fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
}
