use serde::{Deserialize, Serialize};

/// One bar of price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar open time (Unix timestamp ms).
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Create a bar where only the close is known.
    pub fn from_close(timestamp: i64, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

/// Indicator values derived for a single bar.
///
/// Every field is `None` until its trailing window is full, or when the value
/// is mathematically undefined (e.g. a Z-score over a flat window).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorPoint {
    pub moving_average: Option<f64>,
    pub rolling_std: Option<f64>,
    pub z_score: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
}

/// Indicator output aligned index-for-index with the input bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorPoint> {
        self.points.last()
    }

    /// Z-score of the most recent bar, if defined.
    pub fn latest_z_score(&self) -> Option<f64> {
        self.last().and_then(|p| p.z_score)
    }
}
