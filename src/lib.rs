//! Motion TimeSeries Library
//!
//! A time-indexed container for biomechanical and motion-capture data:
//! one time vector, any number of named N-dimensional channels sharing
//! it, a sorted list of named events and a two-level metadata store.
//!
//! # Features
//!
//! - **Gap-aware resampling**: missing samples (NaN rows) are excluded
//!   from the fit and never interpolated across
//! - **Event-based navigation**: slice between named event occurrences
//! - **Missing-sample filling**: repair short dropouts, keep long gaps
//! - **Table round-trip**: flatten shaped channels to scalar columns
//!   and fold them back
//! - **Merging**: combine trials with conflict policies and optional
//!   retiming
//!
//! # Quick Start
//!
//! ```
//! use motion_timeseries::{Channel, Interpolation, TimeSeries};
//!
//! let mut ts = TimeSeries::from_time((0..10).map(f64::from).collect());
//! ts.add_channel("knee_angle", Channel::from_vec(
//!     (0..10).map(|i| f64::from(i) * 0.1).collect(),
//! ), false)?;
//! ts.add_event(4.0, "heel_strike");
//!
//! // Everything from the first heel strike on, event sample included.
//! let stance = ts.ts_after_event("heel_strike", 0, true)?;
//! assert_eq!(stance.time()[0], 4.0);
//!
//! // Twice the sample rate, linearly interpolated.
//! let dense = ts.resample_to_rate(2.0, Interpolation::Linear)?;
//! assert_eq!(dense.len(), 19);
//! # Ok::<(), motion_timeseries::TimeSeriesError>(())
//! ```
//!
//! # Validation
//!
//! Invariants are checked lazily by the operations that need them, so
//! a series can be built in stages. The checks escalate: a valid time
//! vector (no NaN, no duplicates), well-shaped channels, strictly
//! increasing time, constant sample rate.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod channel;
pub mod error;
pub mod event;
pub mod fill;
pub mod info;
pub mod interp;
pub mod merge;
pub mod record;
pub mod resample;
pub mod resolve;
pub mod slice;
pub mod table;
pub mod timeseries;

// Re-exports for convenient access
pub use channel::{Channel, ChannelStore};
pub use error::{Result, TimeSeriesError};
pub use event::{Event, EVENT_TIME_TOLERANCE};
pub use info::{InfoStore, InfoValue, TIME_INFO_KEY};
pub use interp::Interpolation;
pub use merge::{MergeOptions, OnConflict};
pub use record::{ChannelRecord, EventRecord, TimeSeriesRecord};
pub use slice::Inclusivity;
pub use table::Table;
pub use timeseries::TimeSeries;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn walking_trial() -> TimeSeries {
        let n = 100;
        let mut ts = TimeSeries::from_time((0..n).map(|i| f64::from(i) / 100.0).collect());
        ts.add_channel(
            "hip_angle",
            Channel::from_vec((0..n).map(|i| (f64::from(i) / 100.0).sin()).collect()),
            false,
        )
        .unwrap();
        ts.add_event(0.25, "heel_strike");
        ts.add_event(0.75, "heel_strike");
        ts
    }

    #[test]
    fn test_slice_then_resample_pipeline() {
        let ts = walking_trial();
        let cycle = ts
            .ts_between_events("heel_strike", 0, "heel_strike", 1, true)
            .unwrap();
        assert_eq!(cycle.time()[0], 0.25);
        assert_eq!(cycle.time()[cycle.len() - 1], 0.75);

        let dense = cycle.resample_to_rate(1000.0, Interpolation::Linear).unwrap();
        assert!((dense.sample_rate().unwrap() - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_record_pipeline() {
        let ts = walking_trial();
        let rebuilt = TimeSeries::from_record(ts.to_record()).unwrap();
        assert_eq!(ts, rebuilt);
    }

    #[test]
    fn test_merge_pipeline() {
        let angles = walking_trial();
        let mut forces = TimeSeries::from_time((0..100).map(|i| f64::from(i) / 100.0).collect());
        forces
            .add_channel("grf", Channel::from_vec(vec![9.81; 100]), false)
            .unwrap();

        let trial = angles.merge(&forces, &MergeOptions::new()).unwrap();
        assert!(trial.channel("hip_angle").is_ok());
        assert!(trial.channel("grf").is_ok());
    }
}
