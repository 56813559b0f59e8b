use crate::types::IvRankMethod;
use std::env;
use std::path::PathBuf;

/// Indicator window lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    /// Moving average / rolling std / Z-score window.
    pub ma_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_period: 20,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Thresholds applied by the scoring pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Annual risk-free rate (as decimal).
    pub risk_free_rate: f64,
    /// |Z| must exceed this for a directional bias.
    pub z_threshold: f64,
    /// Volume must be strictly greater than this.
    pub min_volume: u64,
    /// Open interest must be strictly greater than this.
    pub min_open_interest: u64,
    pub max_iv_rank: f64,
    pub min_abs_delta: f64,
    pub max_abs_delta: f64,
    pub max_abs_moneyness: f64,
    /// Maximum (ask - bid) / ask.
    pub max_spread_ratio: f64,
    /// Number of candidates returned.
    pub top_n: usize,
    pub iv_rank_method: IvRankMethod,
    pub indicators: IndicatorConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.01,
            z_threshold: 1.0,
            min_volume: 500,
            min_open_interest: 500,
            max_iv_rank: 0.75,
            min_abs_delta: 0.25,
            max_abs_delta: 0.70,
            max_abs_moneyness: 0.10,
            max_spread_ratio: 0.20,
            top_n: 3,
            iv_rank_method: IvRankMethod::Percentile,
            indicators: IndicatorConfig::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the append-only trade log.
    pub trade_log_path: PathBuf,
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trade_log_path: PathBuf::from("trade_log.csv"),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ScoringConfig::default();

        Self {
            trade_log_path: env::var("OPTSCOUT_TRADE_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("trade_log.csv")),
            scoring: ScoringConfig {
                risk_free_rate: parse_env("OPTSCOUT_RISK_FREE_RATE", defaults.risk_free_rate),
                z_threshold: parse_env("OPTSCOUT_Z_THRESHOLD", defaults.z_threshold),
                min_volume: parse_env("OPTSCOUT_MIN_VOLUME", defaults.min_volume),
                min_open_interest: parse_env(
                    "OPTSCOUT_MIN_OPEN_INTEREST",
                    defaults.min_open_interest,
                ),
                max_iv_rank: parse_env("OPTSCOUT_MAX_IV_RANK", defaults.max_iv_rank),
                min_abs_delta: parse_env("OPTSCOUT_MIN_DELTA", defaults.min_abs_delta),
                max_abs_delta: parse_env("OPTSCOUT_MAX_DELTA", defaults.max_abs_delta),
                max_abs_moneyness: parse_env(
                    "OPTSCOUT_MAX_MONEYNESS",
                    defaults.max_abs_moneyness,
                ),
                max_spread_ratio: parse_env("OPTSCOUT_MAX_SPREAD", defaults.max_spread_ratio),
                top_n: parse_env("OPTSCOUT_TOP_N", defaults.top_n),
                iv_rank_method: parse_env("OPTSCOUT_IV_RANK_METHOD", defaults.iv_rank_method),
                indicators: IndicatorConfig::default(),
            },
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or malformed.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
