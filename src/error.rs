//! Error types for time series operations.
//!
//! Every failure in this library maps to a distinct, named variant so
//! that callers (cycle detection, kinematics, file importers) can tell
//! a missing event apart from an out-of-range query or a shape mismatch
//! and react accordingly.

use thiserror::Error;

/// Main error type for time series operations.
#[derive(Error, Debug)]
pub enum TimeSeriesError {
    /// A channel's shape is inconsistent with the time vector.
    #[error("Shape mismatch for channel '{key}': leading dimension is {actual}, expected {expected}")]
    ShapeMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    /// The time vector contains NaNs or duplicate values.
    #[error("Invalid time vector: {0}")]
    InvalidTime(String),

    /// The operation requires a strictly increasing time vector.
    #[error("The time vector is not strictly increasing, which is required by this operation")]
    UnorderedTime,

    /// The operation requires a constant sample interval.
    #[error("The sample rate is not constant, which is required by this operation")]
    NonConstantRate,

    /// A requested index or time falls outside the available span.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A named event occurrence does not exist.
    #[error("Occurrence {occurrence} of event '{name}' was not found")]
    EventNotFound { name: String, occurrence: usize },

    /// A channel or metadata key collides and the conflict policy is set to error.
    #[error("Merge conflict on key '{key}'")]
    MergeConflict { key: String },

    /// The time vector is empty but the operation needs at least one sample.
    #[error("The time series is empty: its time vector has no samples")]
    EmptyTime,

    /// There is no data channel but the operation needs at least one.
    #[error("The time series is empty: it does not contain any data channel")]
    EmptyData,

    /// A requested channel or metadata key does not exist.
    #[error("The key '{key}' was not found")]
    KeyNotFound { key: String },

    /// A key already exists and overwriting was not allowed.
    #[error("The key '{key}' already exists and overwrite is disabled")]
    DuplicateKey { key: String },

    /// An argument failed validation (e.g. reversed bounds).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for time series operations.
pub type Result<T> = std::result::Result<T, TimeSeriesError>;

impl TimeSeriesError {
    /// Create a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(key: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            key: key.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid time error.
    #[must_use]
    pub fn invalid_time(msg: impl Into<String>) -> Self {
        Self::InvalidTime(msg.into())
    }

    /// Create an out-of-range error.
    #[must_use]
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Create an event-not-found error.
    #[must_use]
    pub fn event_not_found(name: impl Into<String>, occurrence: usize) -> Self {
        Self::EventNotFound {
            name: name.into(),
            occurrence,
        }
    }

    /// Create a merge conflict error.
    #[must_use]
    pub fn merge_conflict(key: impl Into<String>) -> Self {
        Self::MergeConflict { key: key.into() }
    }

    /// Create a key-not-found error.
    #[must_use]
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create a duplicate key error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
