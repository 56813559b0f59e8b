//! Relative Strength Index (RSI) indicator.

/// RSI (Relative Strength Index) indicator.
///
/// Compares the mean gain to the mean loss over the trailing `period` close
/// changes. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// A window without losses reads 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// One change per bar after the first, so a full window needs `period + 1` closes.
    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// RSI from a window of signed price changes.
    fn calculate_rsi(changes: &[f64]) -> f64 {
        let n = changes.len() as f64;
        let avg_gain = changes.iter().filter(|c| **c > 0.0).sum::<f64>() / n;
        let avg_loss = -changes.iter().filter(|c| **c < 0.0).sum::<f64>() / n;

        if avg_loss == 0.0 {
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }

    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if self.period == 0 || closes.len() < self.min_periods() {
            return out;
        }

        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        for (offset, window) in changes.windows(self.period).enumerate() {
            // changes[j] is the move into closes[j + 1]
            out[offset + self.period] = Some(Self::calculate_rsi(window));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    fn downtrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 200.0 - i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let out = Rsi::default().series(&uptrend(10));
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_first_defined_index() {
        let out = Rsi::default().series(&uptrend(20));
        assert!(out[13].is_none());
        assert!(out[14].is_some());
    }

    #[test]
    fn test_rsi_uptrend_is_100() {
        let out = Rsi::default().series(&uptrend(50));
        assert_eq!(out[49], Some(100.0));
    }

    #[test]
    fn test_rsi_downtrend_is_0() {
        let out = Rsi::default().series(&downtrend(50));
        assert_eq!(out[49], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_is_100() {
        let out = Rsi::default().series(&[50.0; 20]);
        assert_eq!(out[19], Some(100.0));
    }

    #[test]
    fn test_rsi_value_range() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + ((i * 7) % 11) as f64 - 5.0)
            .collect();
        for value in Rsi::default().series(&closes).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {}", value);
        }
    }

    #[test]
    fn test_rsi_balanced_moves_is_50() {
        let closes: Vec<f64> = (0..15).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        let out = Rsi::default().series(&closes);
        assert!((out[14].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_custom_period() {
        let rsi = Rsi::new(7);
        assert_eq!(rsi.min_periods(), 8);
        let out = rsi.series(&uptrend(20));
        assert!(out[7].is_some());
    }
}
