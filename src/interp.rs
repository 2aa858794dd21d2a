//! One-dimensional interpolation kernels.
//!
//! Pure functions over a strictly increasing abscissa `xs` and values
//! `ys`, evaluated at arbitrary query points. Every kernel extrapolates
//! beyond the fitted span; the resampling engine decides afterwards
//! which evaluated points survive (gap and boundary masking), so the
//! kernels themselves never produce NaN for finite inputs.

/// Interpolation method used by resampling and gap filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Piecewise linear, the default for motion data.
    #[default]
    Linear,
    /// Value of the closest sample.
    Nearest,
    /// Value of the last sample at or before the query (zero-order hold).
    Previous,
    /// Value of the next sample at or after the query.
    Next,
    /// Monotone cubic (Fritsch-Carlson), overshoot-free.
    CubicPchip,
}

/// Evaluate the selected kernel at each query point.
///
/// `xs` must be strictly increasing and `xs`/`ys` the same length, with
/// at least one point. Queries outside the span are extrapolated:
/// linearly for [`Interpolation::Linear`], with the boundary cubic for
/// [`Interpolation::CubicPchip`], and by clamping for the step kernels.
#[must_use]
pub fn evaluate(xs: &[f64], ys: &[f64], queries: &[f64], method: Interpolation) -> Vec<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(!xs.is_empty());
    if xs.len() == 1 {
        return vec![ys[0]; queries.len()];
    }
    match method {
        Interpolation::Linear => queries.iter().map(|&q| linear_at(xs, ys, q)).collect(),
        Interpolation::Nearest => queries.iter().map(|&q| nearest_at(xs, ys, q)).collect(),
        Interpolation::Previous => queries.iter().map(|&q| previous_at(xs, ys, q)).collect(),
        Interpolation::Next => queries.iter().map(|&q| next_at(xs, ys, q)).collect(),
        Interpolation::CubicPchip => {
            let slopes = pchip_slopes(xs, ys);
            queries
                .iter()
                .map(|&q| hermite_at(xs, ys, &slopes, q))
                .collect()
        }
    }
}

/// Index of the segment `[xs[i], xs[i+1]]` used to evaluate `q`,
/// clamped to the outermost segments for extrapolation.
fn segment(xs: &[f64], q: f64) -> usize {
    let i = xs.partition_point(|x| *x <= q);
    i.saturating_sub(1).min(xs.len() - 2)
}

fn linear_at(xs: &[f64], ys: &[f64], q: f64) -> f64 {
    let i = segment(xs, q);
    let t = (q - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}

fn nearest_at(xs: &[f64], ys: &[f64], q: f64) -> f64 {
    let i = segment(xs, q);
    if (q - xs[i]).abs() <= (xs[i + 1] - q).abs() {
        ys[i]
    } else {
        ys[i + 1]
    }
}

fn previous_at(xs: &[f64], ys: &[f64], q: f64) -> f64 {
    let i = xs.partition_point(|x| *x <= q);
    ys[i.saturating_sub(1)]
}

fn next_at(xs: &[f64], ys: &[f64], q: f64) -> f64 {
    let i = xs.partition_point(|x| *x < q);
    ys[i.min(xs.len() - 1)]
}

/// Fritsch-Carlson slopes: harmonic-mean interior slopes that flatten
/// at local extrema, with shape-preserving one-sided end slopes.
fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = ys
        .windows(2)
        .zip(&h)
        .map(|(w, &dx)| (w[1] - w[0]) / dx)
        .collect();

    if n == 2 {
        return vec![delta[0]; 2];
    }

    let mut d = vec![0.0; n];
    for i in 1..n - 1 {
        if delta[i - 1] * delta[i] <= 0.0 {
            d[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            d[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
        }
    }
    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// Three-point one-sided slope estimate at a boundary, clamped so the
/// interpolant stays monotone near the end.
fn end_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if d * delta0 <= 0.0 {
        0.0
    } else if delta0 * delta1 < 0.0 && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

fn hermite_at(xs: &[f64], ys: &[f64], slopes: &[f64], q: f64) -> f64 {
    let i = segment(xs, q);
    let h = xs[i + 1] - xs[i];
    let t = (q - xs[i]) / h;
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * ys[i] + h10 * h * slopes[i] + h01 * ys[i + 1] + h11 * h * slopes[i + 1]
}
