//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::Ema;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD output aligned with the input closes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Bars needed before the signal line is defined.
    pub fn min_periods(&self) -> usize {
        self.fast_period.max(self.slow_period) + self.signal_period - 1
    }

    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let fast = Ema::new(self.fast_period).series(closes);
        let slow = Ema::new(self.slow_period).series(closes);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // Signal line runs over the defined tail of the MACD line
        let mut signal = vec![None; closes.len()];
        if let Some(start) = macd.iter().position(Option::is_some) {
            let tail: Vec<f64> = macd[start..].iter().flatten().copied().collect();
            for (i, value) in Ema::new(self.signal_period).series(&tail).into_iter().enumerate() {
                signal[start + i] = value;
            }
        }

        let histogram = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}
