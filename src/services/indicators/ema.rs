//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) with smoothing factor 2 / (period + 1).
///
/// The first value is the simple mean of the first `period` inputs, so the
/// series is undefined until that many values have been seen.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 || values.len() < self.period {
            return out;
        }

        let multiplier = self.multiplier();

        // First EMA is SMA
        let mut ema = values.iter().take(self.period).sum::<f64>() / self.period as f64;
        out[self.period - 1] = Some(ema);

        for (i, value) in values.iter().enumerate().skip(self.period) {
            ema = (value - ema) * multiplier + ema;
            out[i] = Some(ema);
        }
        out
    }
}
