//! The core time series container.
//!
//! A [`TimeSeries`] composes a time vector, a set of named data
//! channels whose leading axis is time, an ordered event list and a
//! metadata store. It owns all the invariants relating them:
//!
//! - the time vector carries no NaNs and no duplicate values
//!   ([`TimeSeries::check_valid_time`]);
//! - every channel's leading dimension matches the time vector's
//!   length ([`TimeSeries::check_well_shaped`]);
//! - the event list is kept sorted ascending by time after every
//!   mutation.
//!
//! Validation is lazy: invariants are checked by the operations that
//! need them, not on every mutation, so a series can be built in
//! stages (time first, channels later). Position-sensitive operations
//! additionally require strictly increasing time, and frequency-based
//! ones a constant sample rate.
//!
//! All transforms return a new, independently owned series; two series
//! never share mutable state after a clone.

use crate::channel::{Channel, ChannelStore};
use crate::error::{Result, TimeSeriesError};
use crate::event::{sort_events, Event};
use crate::info::{InfoStore, InfoValue};

/// Relative tolerance on sample spacing for the constant-rate check.
const RATE_RTOL: f64 = 1e-5;
/// Absolute tolerance on sample spacing for the constant-rate check.
const RATE_ATOL: f64 = 1e-8;

/// A time-indexed, multi-channel numeric container.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    time: Vec<f64>,
    data: ChannelStore,
    events: Vec<Event>,
    info: InfoStore,
}

impl TimeSeries {
    /// Create an empty series carrying the default time metadata
    /// (`Time / Unit = "s"`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: Vec::new(),
            data: ChannelStore::new(),
            events: Vec::new(),
            info: InfoStore::with_default_time_unit(),
        }
    }

    /// Create a series with the given time vector and no channels.
    #[must_use]
    pub fn from_time(time: Vec<f64>) -> Self {
        let mut ts = Self::new();
        ts.time = time;
        ts
    }

    /// Create a series from a bare array: a single channel named
    /// `"data"` over a synthesized unit-period time vector
    /// `0, 1, 2, ...`.
    #[must_use]
    pub fn from_array(values: Vec<f64>) -> Self {
        let mut ts = Self::from_time((0..values.len()).map(|i| i as f64).collect());
        ts.data.insert("data", Channel::from_vec(values));
        ts
    }

    /// Rebuild a series from its parts. Events are re-sorted.
    #[must_use]
    pub fn from_components(
        time: Vec<f64>,
        data: ChannelStore,
        mut events: Vec<Event>,
        info: InfoStore,
    ) -> Self {
        sort_events(&mut events);
        Self {
            time,
            data,
            events,
            info,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The time vector.
    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Replace the time vector. Validity is checked lazily by the
    /// operations that need it.
    pub fn set_time(&mut self, time: Vec<f64>) {
        self.time = time;
    }

    /// Number of samples in the time vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the time vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// The channel store.
    #[must_use]
    pub fn data(&self) -> &ChannelStore {
        &self.data
    }

    /// A channel by name.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if absent.
    pub fn channel(&self, key: &str) -> Result<&Channel> {
        self.data
            .get(key)
            .ok_or_else(|| TimeSeriesError::key_not_found(key))
    }

    /// The events, sorted ascending by time.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The metadata store.
    #[must_use]
    pub fn info(&self) -> &InfoStore {
        &self.info
    }

    pub(crate) fn data_mut(&mut self) -> &mut ChannelStore {
        &mut self.data
    }

    pub(crate) fn info_mut(&mut self) -> &mut InfoStore {
        &mut self.info
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<Event> {
        &mut self.events
    }

    // ------------------------------------------------------------------
    // Validation checks, from least to most strict
    // ------------------------------------------------------------------

    /// Check that the time vector contains no NaN and no duplicate
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidTime`] otherwise.
    pub fn check_valid_time(&self) -> Result<()> {
        let nans = self.time.iter().filter(|t| t.is_nan()).count();
        if nans > 0 {
            return Err(TimeSeriesError::invalid_time(format!(
                "{nans} NaN value(s) among the {} samples of the time vector",
                self.time.len()
            )));
        }
        let mut sorted = self.time.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(TimeSeriesError::invalid_time(
                "the time vector contains duplicate values",
            ));
        }
        Ok(())
    }

    /// Check that the time vector is valid and that every channel's
    /// leading dimension matches its length.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidTime`] or
    /// [`TimeSeriesError::ShapeMismatch`].
    pub fn check_well_shaped(&self) -> Result<()> {
        self.check_valid_time()?;
        for (key, channel) in self.data.iter() {
            if channel.len() != self.time.len() {
                return Err(TimeSeriesError::shape_mismatch(
                    key,
                    self.time.len(),
                    channel.len(),
                ));
            }
        }
        Ok(())
    }

    /// Check that the time vector has at least one sample.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EmptyTime`] otherwise.
    pub fn check_not_empty_time(&self) -> Result<()> {
        if self.time.is_empty() {
            return Err(TimeSeriesError::EmptyTime);
        }
        Ok(())
    }

    /// Check that the series has at least one data channel.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EmptyData`] otherwise.
    pub fn check_not_empty_data(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(TimeSeriesError::EmptyData);
        }
        Ok(())
    }

    /// Check that the time vector is strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::UnorderedTime`] otherwise (or
    /// [`TimeSeriesError::InvalidTime`] for NaN/duplicate time).
    pub fn check_increasing_time(&self) -> Result<()> {
        self.check_valid_time()?;
        if self.time.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TimeSeriesError::UnorderedTime);
        }
        Ok(())
    }

    /// Check that the sample interval is constant.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::NonConstantRate`] otherwise.
    pub fn check_constant_sample_rate(&self) -> Result<()> {
        if self.sample_rate().is_none() {
            return Err(TimeSeriesError::NonConstantRate);
        }
        Ok(())
    }

    /// The sample rate in samples per time unit, or `None` if the
    /// spacing is not constant (or fewer than two samples exist).
    ///
    /// Spacing counts as constant when every delta is within
    /// `1e-8 + 1e-5 * mean_delta` of the mean delta.
    #[must_use]
    pub fn sample_rate(&self) -> Option<f64> {
        if self.time.len() < 2 {
            return None;
        }
        let deltas: Vec<f64> = self.time.windows(2).map(|w| w[1] - w[0]).collect();
        let mean: f64 = deltas.iter().sum::<f64>() / deltas.len() as f64;
        if mean <= 0.0 || mean.is_nan() {
            return None;
        }
        let tol = RATE_ATOL + RATE_RTOL * mean.abs();
        if deltas.iter().any(|d| (d - mean).abs() > tol) {
            return None;
        }
        Some(1.0 / mean)
    }

    // ------------------------------------------------------------------
    // Equality and equivalence
    // ------------------------------------------------------------------

    /// Tolerance-based comparison: time and channel values are compared
    /// with `|a - b| <= atol + rtol * |b|` (NaN equal to NaN), metadata
    /// and events exactly.
    #[must_use]
    pub fn equivalent(&self, other: &TimeSeries, atol: f64, rtol: f64) -> bool {
        if self.time.len() != other.time.len() {
            return false;
        }
        let close = |a: &f64, b: &f64| {
            (a.is_nan() && b.is_nan()) || (a - b).abs() <= atol + rtol * b.abs()
        };
        if !self.time.iter().zip(&other.time).all(|(a, b)| close(a, b)) {
            return false;
        }
        for (key, _) in self.data.iter().chain(other.data.iter()) {
            let (Some(a), Some(b)) = (self.data.get(key), other.data.get(key)) else {
                return false;
            };
            if !a.allclose(b, atol, rtol) {
                return false;
            }
        }
        self.info == other.info && self.events == other.events
    }

    // ------------------------------------------------------------------
    // Data management
    // ------------------------------------------------------------------

    /// Add a data channel.
    ///
    /// A single-sample channel is broadcast to the time vector's
    /// length. Any other length mismatch is a shape error.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::DuplicateKey`] if the key exists and
    /// `overwrite` is false, or [`TimeSeriesError::ShapeMismatch`] on a
    /// length mismatch that cannot be broadcast.
    pub fn add_channel(
        &mut self,
        key: impl Into<String>,
        channel: impl Into<Channel>,
        overwrite: bool,
    ) -> Result<()> {
        let key = key.into();
        let mut channel = channel.into();
        if !overwrite && self.data.contains_key(&key) {
            return Err(TimeSeriesError::duplicate_key(key));
        }
        if channel.len() != self.time.len() {
            if channel.len() == 1 && !self.time.is_empty() {
                channel = channel.broadcast_to(self.time.len())?;
            } else {
                return Err(TimeSeriesError::shape_mismatch(
                    key,
                    self.time.len(),
                    channel.len(),
                ));
            }
        }
        self.data.insert(key, channel);
        Ok(())
    }

    /// Rename a data channel, carrying its metadata along.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if the old key does not
    /// exist, or [`TimeSeriesError::DuplicateKey`] if the new one does.
    pub fn rename_channel(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if self.data.contains_key(&new) {
            return Err(TimeSeriesError::duplicate_key(new));
        }
        if !self.data.rename(old, new.clone()) {
            return Err(TimeSeriesError::key_not_found(old));
        }
        self.info.rename_subject_if_present(old, &new);
        Ok(())
    }

    /// Remove a data channel and its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if absent.
    pub fn remove_channel(&mut self, key: &str) -> Result<Channel> {
        let channel = self
            .data
            .remove(key)
            .ok_or_else(|| TimeSeriesError::key_not_found(key))?;
        self.info.remove_subject(key);
        Ok(channel)
    }

    /// A new series holding only the selected channels, with their
    /// metadata, the time metadata, the time vector and all events.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] for a missing key.
    pub fn get_subset(&self, keys: &[&str]) -> Result<TimeSeries> {
        let mut out = TimeSeries::from_time(self.time.clone());
        out.events = self.events.clone();
        for key in keys {
            let channel = self.channel(key)?.clone();
            out.data.insert(*key, channel);
            if let Some(inner) = self.info.subject(key) {
                for (info_key, value) in inner {
                    out.info.set(*key, info_key.clone(), value.clone());
                }
            }
        }
        if let Some(inner) = self.info.subject(crate::info::TIME_INFO_KEY) {
            for (info_key, value) in inner {
                out.info
                    .set(crate::info::TIME_INFO_KEY, info_key.clone(), value.clone());
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Metadata management
    // ------------------------------------------------------------------

    /// Add a metadata value for a subject (`"Time"` or a channel name).
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::DuplicateKey`] if the pair exists and
    /// `overwrite` is false.
    pub fn add_info(
        &mut self,
        subject: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<InfoValue>,
        overwrite: bool,
    ) -> Result<()> {
        self.info.add(subject, key, value, overwrite)
    }

    /// Remove a metadata value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if the pair is absent.
    pub fn remove_info(&mut self, subject: &str, key: &str) -> Result<InfoValue> {
        self.info.remove(subject, key)
    }

    /// Rename a metadata subject.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if the subject is
    /// absent, or [`TimeSeriesError::DuplicateKey`] if the new name is
    /// taken.
    pub fn rename_info(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        self.info.rename_subject(old, new)
    }

    // ------------------------------------------------------------------
    // Event management
    // ------------------------------------------------------------------

    /// Add an event. The event list stays sorted ascending by time.
    pub fn add_event(&mut self, time: f64, name: impl Into<String>) {
        self.events.push(Event::new(time, name));
        sort_events(&mut self.events);
    }

    /// Add an event unless an identical one (same name, time within
    /// [`crate::event::EVENT_TIME_TOLERANCE`]) already exists. Returns
    /// whether the event was added.
    pub fn add_event_unique(&mut self, time: f64, name: impl Into<String>) -> bool {
        let candidate = Event::new(time, name);
        if self.events.iter().any(|e| e.is_same(&candidate)) {
            return false;
        }
        self.events.push(candidate);
        sort_events(&mut self.events);
        true
    }

    /// Number of events bearing this name.
    #[must_use]
    pub fn count_events(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name == name).count()
    }

    /// Rename one occurrence of an event (occurrences are ordered by
    /// time), or every event with this name when `occurrence` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EventNotFound`] if no matching event
    /// exists.
    pub fn rename_event(
        &mut self,
        name: &str,
        new_name: impl Into<String>,
        occurrence: Option<usize>,
    ) -> Result<()> {
        let new_name = new_name.into();
        match occurrence {
            Some(occ) => {
                let index = self
                    .nth_event_index(name, occ)
                    .ok_or_else(|| TimeSeriesError::event_not_found(name, occ))?;
                self.events[index].name = new_name;
            }
            None => {
                if self.count_events(name) == 0 {
                    return Err(TimeSeriesError::event_not_found(name, 0));
                }
                for event in &mut self.events {
                    if event.name == name {
                        event.name = new_name.clone();
                    }
                }
            }
        }
        sort_events(&mut self.events);
        Ok(())
    }

    /// Remove one occurrence of an event.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EventNotFound`] if the occurrence
    /// does not exist.
    pub fn remove_event(&mut self, name: &str, occurrence: usize) -> Result<Event> {
        let index = self
            .nth_event_index(name, occurrence)
            .ok_or_else(|| TimeSeriesError::event_not_found(name, occurrence))?;
        Ok(self.events.remove(index))
    }

    /// Remove duplicate events, keeping the first (earliest) of each
    /// group of events sharing a name and a time within
    /// [`crate::event::EVENT_TIME_TOLERANCE`]. Idempotent.
    pub fn remove_duplicate_events(&mut self) {
        let mut kept: Vec<Event> = Vec::with_capacity(self.events.len());
        for event in &self.events {
            if !kept.iter().any(|k| k.is_same(event)) {
                kept.push(event.clone());
            }
        }
        self.events = kept;
    }

    /// Remove every event falling outside the time vector's span.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EmptyTime`] on an empty series.
    pub fn trim_events(&mut self) -> Result<()> {
        self.check_not_empty_time()?;
        let first = self.time.iter().copied().fold(f64::INFINITY, f64::min);
        let last = self.time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        self.events.retain(|e| e.time >= first && e.time <= last);
        Ok(())
    }

    /// Index in the (time-sorted) event list of the nth occurrence of
    /// `name`.
    pub(crate) fn nth_event_index(&self, name: &str, occurrence: usize) -> Option<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name == name)
            .map(|(i, _)| i)
            .nth(occurrence)
    }

    // ------------------------------------------------------------------
    // Time shifting
    // ------------------------------------------------------------------

    /// Shift the time vector and every event time by `dt`.
    pub fn shift(&mut self, dt: f64) {
        for t in &mut self.time {
            *t += dt;
        }
        for event in &mut self.events {
            event.time += dt;
        }
    }

    /// Shift time so the given event occurrence becomes time zero.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::EventNotFound`] if the occurrence
    /// does not exist.
    pub fn sync_event(&mut self, name: &str, occurrence: usize) -> Result<()> {
        let index = self
            .nth_event_index(name, occurrence)
            .ok_or_else(|| TimeSeriesError::event_not_found(name, occurrence))?;
        let t0 = self.events[index].time;
        self.shift(-t0);
        Ok(())
    }
}

impl PartialEq for TimeSeries {
    /// Two series are equal iff their time vectors match elementwise
    /// (NaN-aware), every channel present in either matches elementwise
    /// (a missing channel makes them unequal), metadata matches exactly
    /// and the sorted event lists match exactly.
    fn eq(&self, other: &Self) -> bool {
        if self.time.len() != other.time.len() {
            return false;
        }
        let eq_nan = |a: &f64, b: &f64| a == b || (a.is_nan() && b.is_nan());
        if !self.time.iter().zip(&other.time).all(|(a, b)| eq_nan(a, b)) {
            return false;
        }
        for (key, _) in self.data.iter().chain(other.data.iter()) {
            let (Some(a), Some(b)) = (self.data.get(key), other.data.get(key)) else {
                return false;
            };
            if !a.eq_nan(b) {
                return false;
            }
        }
        self.info == other.info && self.events == other.events
    }
}
