//! Data channels and the channel store.
//!
//! A [`Channel`] is an N-dimensional numeric array stored flat in
//! row-major order, whose leading axis is time: sample `i` is the slice
//! of `width()` contiguous values at row `i`. A marker trajectory is a
//! `(n, 4)` channel, a rigid-body transform series a `(n, 4, 4)`
//! channel, an EMG envelope a plain `(n,)` vector.
//!
//! A sample is *missing* when any value in its row is NaN. Gap-aware
//! resampling and filling build on this definition.
//!
//! The [`ChannelStore`] is an insertion-ordered name-to-channel map, so
//! iteration and serialization stay deterministic.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeSeriesError};

/// An N-dimensional numeric array whose leading axis is time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Channel {
    values: Vec<f64>,
    shape: Vec<usize>,
}

impl Channel {
    /// Create a channel from flat row-major values and a shape.
    ///
    /// `shape[0]` is the number of samples; the remaining axes describe
    /// each sample.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] if the shape is
    /// empty or its product does not match the number of values.
    pub fn new(values: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        if shape.is_empty() {
            return Err(TimeSeriesError::invalid_argument(
                "a channel shape needs at least one axis",
            ));
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(TimeSeriesError::invalid_argument(format!(
                "shape {shape:?} implies {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self { values, shape })
    }

    /// Create a one-dimensional channel from a vector of values.
    #[must_use]
    pub fn from_vec(values: Vec<f64>) -> Self {
        let shape = vec![values.len()];
        Self { values, shape }
    }

    /// Number of samples (length of the leading axis).
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape[0]
    }

    /// Whether the channel holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape[0] == 0
    }

    /// Number of values per sample (product of the trailing axes).
    #[must_use]
    pub fn width(&self) -> usize {
        self.shape[1..].iter().product()
    }

    /// Full shape, leading axis first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Trailing shape (everything past the time axis).
    #[must_use]
    pub fn trailing_shape(&self) -> &[usize] {
        &self.shape[1..]
    }

    /// Flat row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The values of sample `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.width();
        &self.values[i * w..(i + 1) * w]
    }

    /// Whether sample `i` is missing (contains at least one NaN).
    #[must_use]
    pub fn is_missing(&self, i: usize) -> bool {
        self.row(i).iter().any(|v| v.is_nan())
    }

    /// Boolean mask of missing samples, one entry per sample.
    #[must_use]
    pub fn missing_mask(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.is_missing(i)).collect()
    }

    /// Extract component `c` (flat index within a sample) across all
    /// samples, as a plain vector.
    ///
    /// # Panics
    ///
    /// Panics if `c >= width()`.
    #[must_use]
    pub fn component(&self, c: usize) -> Vec<f64> {
        let w = self.width();
        assert!(c < w, "component {c} out of range for width {w}");
        (0..self.len()).map(|i| self.values[i * w + c]).collect()
    }

    /// Rebuild a channel from per-component columns and a trailing shape.
    ///
    /// Inverse of taking [`Channel::component`] for every flat
    /// component index. All columns must have the same length.
    ///
    /// # Panics
    ///
    /// Panics if the column count does not match the trailing shape, or
    /// the columns have uneven lengths.
    #[must_use]
    pub fn from_components(columns: &[Vec<f64>], trailing_shape: &[usize]) -> Self {
        let width: usize = trailing_shape.iter().product();
        assert_eq!(columns.len(), width, "column count must match trailing shape");
        let n = columns.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(n * width);
        for i in 0..n {
            for col in columns {
                assert_eq!(col.len(), n, "uneven column lengths");
                values.push(col[i]);
            }
        }
        let mut shape = vec![n];
        shape.extend_from_slice(trailing_shape);
        Self { values, shape }
    }

    /// A new channel keeping the contiguous sample range `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    #[must_use]
    pub fn slice_rows(&self, start: usize, end: usize) -> Self {
        let w = self.width();
        let values = self.values[start * w..end * w].to_vec();
        let mut shape = self.shape.clone();
        shape[0] = end - start;
        Self { values, shape }
    }

    /// Broadcast a single-sample channel to `n` samples by repetition.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] if the channel does
    /// not hold exactly one sample.
    pub fn broadcast_to(&self, n: usize) -> Result<Self> {
        if self.len() != 1 {
            return Err(TimeSeriesError::invalid_argument(format!(
                "only single-sample channels can be broadcast, this one has {} samples",
                self.len()
            )));
        }
        let mut values = Vec::with_capacity(n * self.width());
        for _ in 0..n {
            values.extend_from_slice(self.row(0));
        }
        let mut shape = self.shape.clone();
        shape[0] = n;
        Ok(Self { values, shape })
    }

    /// A channel of the given shape filled with NaN.
    #[must_use]
    pub fn nan_filled(shape: Vec<usize>) -> Self {
        let total: usize = shape.iter().product();
        Self {
            values: vec![f64::NAN; total],
            shape,
        }
    }

    /// Set every value of sample `i` to NaN.
    pub(crate) fn set_row_nan(&mut self, i: usize) {
        let w = self.width();
        for v in &mut self.values[i * w..(i + 1) * w] {
            *v = f64::NAN;
        }
    }

    /// NaN-aware elementwise equality: shapes must match and values
    /// must be equal, with NaN considered equal to NaN.
    #[must_use]
    pub fn eq_nan(&self, other: &Channel) -> bool {
        self.shape == other.shape
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }

    /// NaN-aware closeness: `|a - b| <= atol + rtol * |b|` elementwise,
    /// with NaN equal to NaN. Shapes must match.
    #[must_use]
    pub fn allclose(&self, other: &Channel, atol: f64, rtol: f64) -> bool {
        self.shape == other.shape
            && self.values.iter().zip(&other.values).all(|(a, b)| {
                (a.is_nan() && b.is_nan()) || (a - b).abs() <= atol + rtol * b.abs()
            })
    }
}

impl From<Vec<f64>> for Channel {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

/// Insertion-ordered map from channel name to [`Channel`].
///
/// Channel counts in motion trials are small (tens), so lookups are a
/// linear scan over a vector, which keeps iteration order deterministic
/// without extra bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelStore {
    entries: Vec<(String, Channel)>,
}

impl ChannelStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a channel with this name exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get a channel by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Channel> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Get a mutable channel by name.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Channel> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    /// Insert or replace a channel. Replacing keeps the channel's
    /// position in the iteration order.
    pub fn insert(&mut self, key: impl Into<String>, channel: Channel) {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            *slot = channel;
        } else {
            self.entries.push((key, channel));
        }
    }

    /// Remove a channel, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Channel> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Rename a channel, keeping its position. Returns false if the
    /// old name does not exist.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == old) {
            entry.0 = new.into();
            true
        } else {
            false
        }
    }

    /// Iterate over `(name, channel)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Channel)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Iterate over channel names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}
