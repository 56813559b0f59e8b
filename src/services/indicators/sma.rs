//! Simple Moving Average (SMA) indicator.

/// SMA (Simple Moving Average) over a trailing window of closes.
pub struct Sma {
    period: usize,
}

impl Default for Sma {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// Mean of `values[i + 1 - period..=i]` for every index `i`.
    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        rolling(values, self.period, |window| {
            Some(window.iter().sum::<f64>() / window.len() as f64)
        })
    }
}

/// Apply `f` to every full trailing window; leading indices are `None`.
pub(crate) fn rolling<F>(values: &[f64], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for (offset, window) in values.windows(period).enumerate() {
        out[offset + period - 1] = f(window);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_undefined_before_window() {
        let sma = Sma::new(3);
        let out = sma.series(&[1.0, 2.0]);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn test_sma_values() {
        let sma = Sma::new(3);
        let out = sma.series(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_constant_series() {
        let sma = Sma::default();
        let closes = vec![42.0; 20];
        let out = sma.series(&closes);
        assert_eq!(out[19], Some(42.0));
        assert!(out[..19].iter().all(Option::is_none));
    }
}
