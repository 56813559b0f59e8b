//! Technical indicator implementations.
//!
//! Every indicator maps a close series to an equally long series of
//! `Option<f64>`, where index `i` only depends on closes `0..=i`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use ema::Ema;
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::{RollingStd, ZScore};

use crate::config::IndicatorConfig;
use crate::error::{Result, ScoutError};
use crate::types::{IndicatorPoint, IndicatorSeries, PriceBar};
use tracing::debug;

/// Enriches a price history with moving average, Z-score, RSI and MACD.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Longest window any indicator needs before it produces a value.
    pub fn warmup_bars(&self) -> usize {
        let c = &self.config;
        let macd = Macd::new(c.macd_fast, c.macd_slow, c.macd_signal).min_periods();
        c.ma_period.max(c.rsi_period + 1).max(macd)
    }

    /// Compute every indicator for `bars`.
    ///
    /// Short input is not an error: leading values stay `None`. A close that
    /// is not a positive finite number is rejected.
    pub fn compute(&self, bars: &[PriceBar]) -> Result<IndicatorSeries> {
        let closes = closes(bars)?;
        let c = &self.config;

        let means = Sma::new(c.ma_period).series(&closes);
        let stds = RollingStd::new(c.ma_period).series(&closes);
        let z_scores = ZScore::combine(&closes, &means, &stds);
        let rsi = Rsi::new(c.rsi_period).series(&closes);
        let macd = Macd::new(c.macd_fast, c.macd_slow, c.macd_signal).series(&closes);

        let points = (0..closes.len())
            .map(|i| IndicatorPoint {
                moving_average: means[i],
                rolling_std: stds[i],
                z_score: z_scores[i],
                rsi: rsi[i],
                macd: macd.macd[i],
                macd_signal: macd.signal[i],
                macd_histogram: macd.histogram[i],
            })
            .collect();

        if bars.len() < self.warmup_bars() {
            debug!(
                "Indicator input has {} bars, fewer than the {} needed for every series",
                bars.len(),
                self.warmup_bars()
            );
        }

        Ok(IndicatorSeries { points })
    }
}

/// Extract closes, rejecting values no price can take.
fn closes(bars: &[PriceBar]) -> Result<Vec<f64>> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if bar.close.is_finite() && bar.close > 0.0 {
                Ok(bar.close)
            } else {
                Err(ScoutError::invalid(format!(
                    "bar {} has invalid close {}",
                    i, bar.close
                )))
            }
        })
        .collect()
}
