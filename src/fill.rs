//! Filling missing samples on a constant-rate series.
//!
//! Each channel is rebuilt by interpolating over its visible samples
//! on the unchanged time vector, then every original missing run
//! longer than the caller's budget gets its NaNs back. Short dropouts
//! (a few occluded camera frames) are repaired; long ones are treated
//! as genuinely absent data. Boundary runs count their actual length,
//! the same as interior ones.

use log::warn;

use crate::channel::Channel;
use crate::error::Result;
use crate::interp::{evaluate, Interpolation};
use crate::resample::missing_runs;
use crate::timeseries::TimeSeries;

impl TimeSeries {
    /// Fill missing samples by interpolation, in every channel.
    ///
    /// Runs of consecutive missing samples strictly longer than
    /// `max_missing_samples` stay missing; `0` means fill everything.
    /// A channel with fewer than three visible samples comes out all
    /// NaN (with a logged warning), the same as when resampling.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TimeSeriesError::NonConstantRate`] unless the
    /// sample spacing is constant, or the shape errors of the
    /// well-shapedness check.
    pub fn fill_missing_samples(
        &self,
        max_missing_samples: usize,
        method: Interpolation,
    ) -> Result<TimeSeries> {
        self.check_well_shaped()?;
        self.check_constant_sample_rate()?;

        let mut out = self.clone();
        for (key, channel) in self.data().iter() {
            let mask = channel.missing_mask();
            let runs = missing_runs(&mask);
            if runs.is_empty() {
                continue;
            }
            let valid: Vec<usize> = (0..channel.len()).filter(|&i| !mask[i]).collect();
            if valid.len() < 3 {
                warn!(
                    "channel {key} has only {} visible sample(s), filled output is all NaN",
                    valid.len()
                );
                let mut shape = vec![channel.len()];
                shape.extend_from_slice(channel.trailing_shape());
                out.data_mut().insert(key, Channel::nan_filled(shape));
                continue;
            }

            let xs: Vec<f64> = valid.iter().map(|&i| self.time()[i]).collect();
            let columns: Vec<Vec<f64>> = (0..channel.width())
                .map(|c| {
                    let full = channel.component(c);
                    let ys: Vec<f64> = valid.iter().map(|&i| full[i]).collect();
                    evaluate(&xs, &ys, self.time(), method)
                })
                .collect();
            let mut filled = Channel::from_components(&columns, channel.trailing_shape());

            if max_missing_samples > 0 {
                for (run_start, run_end) in runs {
                    if run_end - run_start + 1 > max_missing_samples {
                        for i in run_start..=run_end {
                            filled.set_row_nan(i);
                        }
                    }
                }
            }
            out.data_mut().insert(key, filled);
        }
        Ok(out)
    }
}
