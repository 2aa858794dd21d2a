//! Descriptive metadata attached to the time axis and to channels.
//!
//! The [`InfoStore`] is a two-level map: subject → attribute → value.
//! The outer key `"Time"` is reserved for time-axis metadata
//! (conventionally `{"Unit": "s"}`); every other outer key names a
//! channel. A channel may exist without metadata and vice versa.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeSeriesError};

/// Reserved outer key for time-axis metadata.
pub const TIME_INFO_KEY: &str = "Time";

/// A metadata value: unit strings, scalar calibration factors, colour
/// triplets and similar descriptive tags.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InfoValue {
    Str(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    FloatList(Vec<f64>),
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Str(s) => write!(f, "{s}"),
            InfoValue::Float(v) => write!(f, "{v}"),
            InfoValue::Int(v) => write!(f, "{v}"),
            InfoValue::Bool(v) => write!(f, "{v}"),
            InfoValue::FloatList(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<&str> for InfoValue {
    fn from(s: &str) -> Self {
        InfoValue::Str(s.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(s: String) -> Self {
        InfoValue::Str(s)
    }
}

impl From<f64> for InfoValue {
    fn from(v: f64) -> Self {
        InfoValue::Float(v)
    }
}

impl From<i64> for InfoValue {
    fn from(v: i64) -> Self {
        InfoValue::Int(v)
    }
}

impl From<bool> for InfoValue {
    fn from(v: bool) -> Self {
        InfoValue::Bool(v)
    }
}

impl From<Vec<f64>> for InfoValue {
    fn from(v: Vec<f64>) -> Self {
        InfoValue::FloatList(v)
    }
}

/// Two-level metadata map with validated, overwrite-guarded mutation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InfoStore {
    entries: BTreeMap<String, BTreeMap<String, InfoValue>>,
}

impl InfoStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store carrying the default time metadata
    /// (`Time / Unit = "s"`).
    #[must_use]
    pub fn with_default_time_unit() -> Self {
        let mut store = Self::new();
        store.set(TIME_INFO_KEY, "Unit", "s");
        store
    }

    /// Whether any metadata exists for this subject.
    #[must_use]
    pub fn contains_subject(&self, subject: &str) -> bool {
        self.entries.contains_key(subject)
    }

    /// Get a metadata value.
    #[must_use]
    pub fn get(&self, subject: &str, key: &str) -> Option<&InfoValue> {
        self.entries.get(subject).and_then(|inner| inner.get(key))
    }

    /// All metadata for one subject, if any.
    #[must_use]
    pub fn subject(&self, subject: &str) -> Option<&BTreeMap<String, InfoValue>> {
        self.entries.get(subject)
    }

    /// Set a metadata value unconditionally.
    pub fn set(&mut self, subject: impl Into<String>, key: impl Into<String>, value: impl Into<InfoValue>) {
        self.entries
            .entry(subject.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Add a metadata value, refusing to overwrite an existing one
    /// unless `overwrite` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::DuplicateKey`] if the (subject, key)
    /// pair already exists and `overwrite` is false.
    pub fn add(
        &mut self,
        subject: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<InfoValue>,
        overwrite: bool,
    ) -> Result<()> {
        let subject = subject.into();
        let key = key.into();
        if !overwrite && self.get(&subject, &key).is_some() {
            return Err(TimeSeriesError::duplicate_key(format!("{subject}/{key}")));
        }
        self.set(subject, key, value);
        Ok(())
    }

    /// Remove a metadata value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if the (subject, key)
    /// pair does not exist.
    pub fn remove(&mut self, subject: &str, key: &str) -> Result<InfoValue> {
        let inner = self
            .entries
            .get_mut(subject)
            .ok_or_else(|| TimeSeriesError::key_not_found(subject))?;
        let value = inner
            .remove(key)
            .ok_or_else(|| TimeSeriesError::key_not_found(format!("{subject}/{key}")))?;
        if inner.is_empty() {
            self.entries.remove(subject);
        }
        Ok(value)
    }

    /// Remove every metadata entry for one subject. Quiet if absent.
    pub fn remove_subject(&mut self, subject: &str) {
        self.entries.remove(subject);
    }

    /// Rename a subject, moving all its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::KeyNotFound`] if the subject does not
    /// exist, or [`TimeSeriesError::DuplicateKey`] if the new name is
    /// already taken.
    pub fn rename_subject(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if self.entries.contains_key(&new) {
            return Err(TimeSeriesError::duplicate_key(new));
        }
        let inner = self
            .entries
            .remove(old)
            .ok_or_else(|| TimeSeriesError::key_not_found(old))?;
        self.entries.insert(new, inner);
        Ok(())
    }

    /// Rename a subject if it exists, quietly doing nothing otherwise.
    /// Used when a channel rename should carry its metadata along.
    pub(crate) fn rename_subject_if_present(&mut self, old: &str, new: &str) {
        if self.entries.contains_key(old) && !self.entries.contains_key(new) {
            if let Some(inner) = self.entries.remove(old) {
                self.entries.insert(new.to_string(), inner);
            }
        }
    }

    /// Iterate over `(subject, key, value)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &InfoValue)> {
        self.entries.iter().flat_map(|(subject, inner)| {
            inner
                .iter()
                .map(move |(key, value)| (subject.as_str(), key.as_str(), value))
        })
    }
}
