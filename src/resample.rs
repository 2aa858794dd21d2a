//! Gap-aware resampling onto a new time vector.
//!
//! Each channel is resampled independently. Missing samples (rows
//! containing NaN) are excluded from the fit, and the output is masked
//! so that interpolation never invents data across a gap: every
//! maximal run of missing samples maps to the open time interval
//! between its valid neighbours, and new samples strictly inside that
//! interval come out NaN. Unless extrapolation is requested, the same
//! applies outside the span of the channel's valid samples.
//!
//! Gap boundaries are taken from the original *time values*, not from
//! sample counts, so irregularly sampled input is handled correctly.

use log::warn;

use crate::channel::Channel;
use crate::error::{Result, TimeSeriesError};
use crate::interp::{evaluate, Interpolation};
use crate::timeseries::TimeSeries;

/// Fewest non-missing samples a channel needs to be resampled.
const MIN_FIT_SAMPLES: usize = 3;

/// Maximal runs of `true` in the mask, as inclusive index ranges.
pub(crate) fn missing_runs(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &missing) in mask.iter().enumerate() {
        match (missing, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, mask.len() - 1));
    }
    runs
}

/// Resample one channel onto `new_time`, fitting over its valid
/// samples only and re-masking gaps afterwards.
pub(crate) fn resample_channel(
    key: &str,
    channel: &Channel,
    old_time: &[f64],
    new_time: &[f64],
    method: Interpolation,
    extrapolate: bool,
) -> Channel {
    let mask = channel.missing_mask();
    let valid: Vec<usize> = (0..channel.len()).filter(|&i| !mask[i]).collect();

    let mut shape = vec![new_time.len()];
    shape.extend_from_slice(channel.trailing_shape());

    if valid.len() < MIN_FIT_SAMPLES {
        warn!(
            "channel {key} has only {} non-missing sample(s), resampled output is all NaN",
            valid.len()
        );
        return Channel::nan_filled(shape);
    }

    let xs: Vec<f64> = valid.iter().map(|&i| old_time[i]).collect();
    let columns: Vec<Vec<f64>> = (0..channel.width())
        .map(|c| {
            let full = channel.component(c);
            let ys: Vec<f64> = valid.iter().map(|&i| full[i]).collect();
            evaluate(&xs, &ys, new_time, method)
        })
        .collect();
    let mut out = Channel::from_components(&columns, channel.trailing_shape());

    // Interior gaps: NaN out every new sample strictly between the
    // valid neighbours of a missing run.
    for (run_start, run_end) in missing_runs(&mask) {
        if run_start == 0 || run_end == channel.len() - 1 {
            continue;
        }
        let lo = old_time[run_start - 1];
        let hi = old_time[run_end + 1];
        for (j, &t) in new_time.iter().enumerate() {
            if t > lo && t < hi {
                out.set_row_nan(j);
            }
        }
    }

    if !extrapolate {
        let first = xs[0];
        let last = xs[xs.len() - 1];
        for (j, &t) in new_time.iter().enumerate() {
            if t < first || t > last {
                out.set_row_nan(j);
            }
        }
    }

    out
}

impl TimeSeries {
    /// Resample every channel onto a new time vector.
    ///
    /// Channels with fewer than three non-missing samples come out all
    /// NaN (with a logged warning). Events and metadata are carried
    /// over unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidTime`] if `new_time` contains
    /// NaN, or the shape and ordering errors of the underlying checks.
    pub fn resample(
        &self,
        new_time: &[f64],
        method: Interpolation,
        extrapolate: bool,
    ) -> Result<TimeSeries> {
        self.check_well_shaped()?;
        self.check_increasing_time()?;
        self.check_not_empty_time()?;
        if new_time.iter().any(|t| t.is_nan()) {
            return Err(TimeSeriesError::invalid_time(
                "the new time vector contains NaN values",
            ));
        }

        let mut out = self.clone();
        out.set_time(new_time.to_vec());
        for (key, channel) in self.data().iter() {
            let resampled =
                resample_channel(key, channel, self.time(), new_time, method, extrapolate);
            out.data_mut().insert(key, resampled);
        }
        Ok(out)
    }

    /// Resample onto a regular grid at `rate` samples per time unit.
    ///
    /// The grid starts at the first time value with spacing `1 / rate`;
    /// a final sample that would overshoot the last time value is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::InvalidArgument`] for a non-positive
    /// or non-finite rate, plus the errors of [`TimeSeries::resample`].
    pub fn resample_to_rate(&self, rate: f64, method: Interpolation) -> Result<TimeSeries> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(TimeSeriesError::invalid_argument(format!(
                "sample rate must be positive and finite, got {rate}"
            )));
        }
        self.check_increasing_time()?;
        self.check_not_empty_time()?;

        let t0 = self.time()[0];
        let t_last = self.time()[self.len() - 1];
        let period = 1.0 / rate;
        let count = ((t_last - t0) / period).floor() as usize + 1;
        let mut new_time: Vec<f64> = (0..count).map(|k| t0 + k as f64 * period).collect();
        while new_time.last().is_some_and(|t| *t > t_last) {
            new_time.pop();
        }
        self.resample(&new_time, method, false)
    }
}
