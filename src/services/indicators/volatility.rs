//! Rolling standard deviation and Z-score.

use super::sma::{rolling, Sma};

/// Relative tolerance below which a window is considered flat.
const FLAT_TOLERANCE: f64 = 1e-12;

/// Sample (n - 1) standard deviation over a trailing window.
pub struct RollingStd {
    period: usize,
}

impl Default for RollingStd {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate sample standard deviation of a window.
    fn std_dev(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        Some(variance.sqrt())
    }

    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        rolling(values, self.period, Self::std_dev)
    }
}

/// Z-score of each close against its trailing mean and standard deviation.
///
/// Undefined while the window is incomplete and for flat windows (zero std).
pub struct ZScore {
    period: usize,
}

impl Default for ZScore {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl ZScore {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        let means = Sma::new(self.period).series(values);
        let stds = RollingStd::new(self.period).series(values);
        Self::combine(values, &means, &stds)
    }

    /// Combine precomputed mean and std series into Z-scores.
    pub fn combine(values: &[f64], means: &[Option<f64>], stds: &[Option<f64>]) -> Vec<Option<f64>> {
        values
            .iter()
            .zip(means.iter().zip(stds.iter()))
            .map(|(&close, (&mean, &std))| {
                let (mean, std) = (mean?, std?);
                if std <= FLAT_TOLERANCE * mean.abs().max(1.0) {
                    return None;
                }
                Some((close - mean) / std)
            })
            .collect()
    }
}
