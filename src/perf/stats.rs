//! Summary statistics over iteration scores.

use serde::Serialize;

/// Two-sided 99.9% Student-t quantiles (p = 0.9995) for 1..=30 degrees of freedom.
const T_999: [f64; 30] = [
    636.619, 31.599, 12.924, 8.610, 6.869, 5.959, 5.408, 5.041, 4.781, 4.587, 4.437, 4.318,
    4.221, 4.140, 4.073, 4.015, 3.965, 3.922, 3.883, 3.850, 3.819, 3.792, 3.768, 3.745, 3.725,
    3.707, 3.690, 3.674, 3.659, 3.646,
];

/// Standard normal quantile at p = 0.9995.
const Z_999: f64 = 3.290_526_731;

/// Student-t quantile for a two-sided 99.9% interval.
///
/// Exact table values up to 30 degrees of freedom, Cornish-Fisher expansion
/// of the normal quantile beyond.
#[must_use]
pub fn t_quantile_999(df: usize) -> f64 {
    if df == 0 {
        return f64::NAN;
    }
    if df <= T_999.len() {
        return T_999[df - 1];
    }
    let z = Z_999;
    let n = df as f64;
    let z3 = z.powi(3);
    let z5 = z.powi(5);
    let z7 = z.powi(7);
    z + (z3 + z) / (4.0 * n)
        + (5.0 * z5 + 16.0 * z3 + 3.0 * z) / (96.0 * n * n)
        + (3.0 * z7 + 19.0 * z5 + 17.0 * z3 - 15.0 * z) / (384.0 * n * n * n)
}

/// Statistics of one benchmark entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of samples.
    pub n: usize,
    /// Arithmetic mean, the reported score.
    pub mean: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Sample standard deviation, NaN below two samples.
    pub std_dev: f64,
    /// Half-width of the 99.9% confidence interval, NaN below two samples.
    pub error: f64,
}

impl Statistics {
    /// Summarize samples; `None` when there are none.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (std_dev, error) = if n > 1 {
            let variance =
                samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            let std_dev = variance.sqrt();
            (std_dev, t_quantile_999(n - 1) * std_dev / (n as f64).sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };

        Some(Self {
            n,
            mean,
            min,
            max,
            std_dev,
            error,
        })
    }
}
