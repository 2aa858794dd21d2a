//! Merging two series into one.
//!
//! [`TimeSeries::merge`] pulls channels (all of them, or a selection)
//! from another series into a copy of the receiver, together with
//! their metadata and events. Both inputs stay untouched.
//!
//! When the time bases differ, merging either fails (the default) or
//! retimes the incoming channels onto the receiver's time vector via
//! the resampling engine, depending on [`MergeOptions::with_resample`].
//! Name collisions follow a conflict policy: fail, log a warning, or
//! stay silent, combined with an overwrite switch deciding which side
//! wins.

use log::warn;

use crate::error::{Result, TimeSeriesError};
use crate::info::TIME_INFO_KEY;
use crate::interp::Interpolation;
use crate::timeseries::TimeSeries;

/// What to do when both sides define the same channel or metadata
/// entry with different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Resolve silently according to the overwrite switch.
    Mute,
    /// Log a warning, then resolve according to the overwrite switch.
    #[default]
    Warning,
    /// Fail with [`TimeSeriesError::MergeConflict`].
    Error,
}

/// Options for [`TimeSeries::merge`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    keys: Option<Vec<String>>,
    resample: bool,
    interpolation: Interpolation,
    merge_events: bool,
    merge_info: bool,
    overwrite: bool,
    on_conflict: OnConflict,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            keys: None,
            resample: false,
            interpolation: Interpolation::Linear,
            merge_events: true,
            merge_info: true,
            overwrite: false,
            on_conflict: OnConflict::Warning,
        }
    }
}

impl MergeOptions {
    /// Default options: merge every channel, no retiming, keep the
    /// receiver's side on conflict with a logged warning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge only the named channels instead of all of them.
    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Allow differing time bases by retiming the incoming channels
    /// onto the receiver's time vector.
    #[must_use]
    pub fn with_resample(mut self, resample: bool) -> Self {
        self.resample = resample;
        self
    }

    /// Interpolation method used when retiming.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Whether to carry the other side's events over (default true).
    #[must_use]
    pub fn with_merge_events(mut self, merge_events: bool) -> Self {
        self.merge_events = merge_events;
        self
    }

    /// Whether to carry the other side's metadata over (default true).
    #[must_use]
    pub fn with_merge_info(mut self, merge_info: bool) -> Self {
        self.merge_info = merge_info;
        self
    }

    /// Whether the incoming side wins on conflict (default false).
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Conflict policy (default [`OnConflict::Warning`]).
    #[must_use]
    pub fn with_on_conflict(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = on_conflict;
        self
    }
}

impl TimeSeries {
    /// Merge channels from `other` into a copy of this series.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if a selected key does
    /// not exist in `other`, [`TimeSeriesError::InvalidArgument`] if
    /// the time bases differ and resampling is off, and
    /// [`TimeSeriesError::MergeConflict`] under the
    /// [`OnConflict::Error`] policy. Retiming propagates the
    /// resampling errors.
    pub fn merge(&self, other: &TimeSeries, options: &MergeOptions) -> Result<TimeSeries> {
        let keys: Vec<String> = match &options.keys {
            Some(keys) => {
                for key in keys {
                    if !other.data().contains_key(key) {
                        return Err(TimeSeriesError::key_not_found(key.clone()));
                    }
                }
                keys.clone()
            }
            None => other.data().keys().map(String::from).collect(),
        };

        let mut out = self.clone();
        if out.is_empty() && out.data().is_empty() {
            out.set_time(other.time().to_vec());
        }

        let same_time = out.len() == other.len()
            && out
                .time()
                .iter()
                .zip(other.time())
                .all(|(a, b)| a == b);
        let source = if same_time {
            other.clone()
        } else if options.resample {
            other.resample(out.time(), options.interpolation, true)?
        } else {
            return Err(TimeSeriesError::invalid_argument(
                "the time vectors differ, enable resampling to merge anyway",
            ));
        };

        for key in &keys {
            let incoming = source.channel(key)?.clone();
            if out.data().contains_key(key) {
                match options.on_conflict {
                    OnConflict::Error => {
                        return Err(TimeSeriesError::merge_conflict(key.clone()));
                    }
                    OnConflict::Warning => {
                        let winner = if options.overwrite { "incoming" } else { "existing" };
                        warn!("channel {key} exists on both sides, keeping the {winner} one");
                    }
                    OnConflict::Mute => {}
                }
                if !options.overwrite {
                    continue;
                }
            }
            out.data_mut().insert(key.clone(), incoming);
        }

        if options.merge_info {
            for (subject, key, value) in other.info().iter() {
                let relevant = subject == TIME_INFO_KEY || keys.iter().any(|k| k == subject);
                if !relevant {
                    continue;
                }
                match out.info().get(subject, key) {
                    Some(existing) if existing == value => {}
                    Some(_) => {
                        match options.on_conflict {
                            OnConflict::Error => {
                                return Err(TimeSeriesError::merge_conflict(format!(
                                    "{subject}/{key}"
                                )));
                            }
                            OnConflict::Warning => {
                                let winner =
                                    if options.overwrite { "incoming" } else { "existing" };
                                warn!(
                                    "info {subject}/{key} differs between sides, keeping the {winner} value"
                                );
                            }
                            OnConflict::Mute => {}
                        }
                        if options.overwrite {
                            out.info_mut().set(subject, key, value.clone());
                        }
                    }
                    None => out.info_mut().set(subject, key, value.clone()),
                }
            }
        }

        if options.merge_events {
            for event in other.events() {
                out.add_event_unique(event.time, event.name.clone());
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;

    fn series(keys: &[&str]) -> TimeSeries {
        let mut ts = TimeSeries::from_time((0..5).map(f64::from).collect());
        for key in keys {
            ts.add_channel(*key, Channel::from_vec((0..5).map(f64::from).collect()), false)
                .unwrap();
        }
        ts
    }

    #[test]
    fn test_merge_disjoint_channels() {
        let a = series(&["left"]);
        let b = series(&["right"]);
        let merged = a.merge(&b, &MergeOptions::new()).unwrap();
        assert!(merged.channel("left").is_ok());
        assert!(merged.channel("right").is_ok());
        // Inputs untouched.
        assert!(a.channel("right").is_err());
    }

    #[test]
    fn test_merge_selected_keys() {
        let a = series(&[]);
        let b = series(&["one", "two"]);
        let merged = a
            .merge(&b, &MergeOptions::new().with_keys(["one"]))
            .unwrap();
        assert!(merged.channel("one").is_ok());
        assert!(merged.channel("two").is_err());

        assert!(matches!(
            a.merge(&b, &MergeOptions::new().with_keys(["missing"])),
            Err(TimeSeriesError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_merge_conflict_policies() {
        let mut a = series(&[]);
        a.add_channel("x", Channel::from_vec(vec![1.0; 5]), false)
            .unwrap();
        let mut b = series(&[]);
        b.add_channel("x", Channel::from_vec(vec![2.0; 5]), false)
            .unwrap();

        assert!(matches!(
            a.merge(&b, &MergeOptions::new().with_on_conflict(OnConflict::Error)),
            Err(TimeSeriesError::MergeConflict { .. })
        ));

        let kept = a.merge(&b, &MergeOptions::new()).unwrap();
        assert_eq!(kept.channel("x").unwrap().values()[0], 1.0);

        let replaced = a
            .merge(&b, &MergeOptions::new().with_overwrite(true))
            .unwrap();
        assert_eq!(replaced.channel("x").unwrap().values()[0], 2.0);
    }

    #[test]
    fn test_merge_differing_time_bases() {
        let a = series(&["left"]);
        let mut b = TimeSeries::from_time((0..9).map(|i| f64::from(i) * 0.5).collect());
        b.add_channel(
            "right",
            Channel::from_vec((0..9).map(|i| f64::from(i) * 0.5).collect()),
            false,
        )
        .unwrap();

        assert!(matches!(
            a.merge(&b, &MergeOptions::new()),
            Err(TimeSeriesError::InvalidArgument(_))
        ));

        let merged = a
            .merge(&b, &MergeOptions::new().with_resample(true))
            .unwrap();
        assert_eq!(merged.channel("right").unwrap().len(), 5);
        assert_eq!(merged.channel("right").unwrap().values()[2], 2.0);
    }

    #[test]
    fn test_merge_into_empty_adopts_time() {
        let empty = TimeSeries::new();
        let b = series(&["data"]);
        let merged = empty.merge(&b, &MergeOptions::new()).unwrap();
        assert_eq!(merged.time(), b.time());
        assert!(merged.channel("data").is_ok());
    }

    #[test]
    fn test_merge_info_identical_values_not_a_conflict() {
        let mut a = series(&["left"]);
        a.add_info("Time", "Frequency", 100.0, false).unwrap();
        let mut b = series(&["right"]);
        b.add_info("Time", "Frequency", 100.0, false).unwrap();

        let merged = a
            .merge(&b, &MergeOptions::new().with_on_conflict(OnConflict::Error))
            .unwrap();
        assert_eq!(
            merged.info().get("Time", "Frequency"),
            Some(&crate::info::InfoValue::Float(100.0))
        );
    }

    #[test]
    fn test_merge_info_conflict() {
        let mut a = series(&["x"]);
        a.add_info("x", "Unit", "m", false).unwrap();
        let mut b = series(&[]);
        b.add_channel("x", Channel::from_vec(vec![0.0; 5]), false)
            .unwrap();
        b.add_info("x", "Unit", "mm", false).unwrap();

        let opts = MergeOptions::new()
            .with_overwrite(true)
            .with_on_conflict(OnConflict::Mute);
        let merged = a.merge(&b, &opts).unwrap();
        assert_eq!(
            merged.info().get("x", "Unit"),
            Some(&crate::info::InfoValue::Str("mm".to_string()))
        );
    }

    #[test]
    fn test_merge_events_unique() {
        let mut a = series(&["x"]);
        a.add_event(1.0, "sync");
        let mut b = series(&["y"]);
        b.add_event(1.0, "sync");
        b.add_event(2.0, "other");

        let merged = a.merge(&b, &MergeOptions::new()).unwrap();
        assert_eq!(merged.events().len(), 2);

        let no_events = a
            .merge(&b, &MergeOptions::new().with_merge_events(false))
            .unwrap();
        assert_eq!(no_events.events().len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent_on_info() {
        let mut a = series(&["x"]);
        a.add_info("x", "Unit", "m", false).unwrap();
        let once = a.merge(&a.clone(), &MergeOptions::new()).unwrap();
        let twice = once.merge(&a, &MergeOptions::new()).unwrap();
        assert_eq!(once, twice);
    }
}
