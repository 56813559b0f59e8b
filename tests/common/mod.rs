#![allow(dead_code)]

use chrono::NaiveDate;
use optscout::{OptionQuote, OptionType, PriceBar};

pub const DAY_MS: i64 = 86_400_000;
pub const EXPIRY: &str = "2024-02-01";

/// Pricing date 30 days before `EXPIRY`.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| PriceBar::from_close(1_700_000_000_000 + i as i64 * DAY_MS, *c))
        .collect()
}

/// Flat history at 100 ending in a jump to `last`; the final Z-score is +/-4.25.
pub fn history_ending_at(last: f64) -> Vec<PriceBar> {
    let mut closes = vec![100.0; 39];
    closes.push(last);
    bars(&closes)
}

/// History whose last close sits exactly on its 20-bar mean (Z-score 0).
pub fn neutral_history() -> Vec<PriceBar> {
    let mut closes = vec![100.0; 20];
    for _ in 0..9 {
        closes.push(98.0);
        closes.push(102.0);
    }
    closes.push(100.0);
    closes.push(100.0);
    bars(&closes)
}

pub fn quote(symbol: &str, option_type: OptionType, strike: f64, iv: f64) -> OptionQuote {
    OptionQuote {
        contract_symbol: symbol.to_string(),
        option_type,
        strike,
        bid: 1.9,
        ask: 2.0,
        last_price: 1.95,
        volume: 1000,
        open_interest: 1000,
        implied_volatility: iv,
        in_the_money: Some(false),
    }
}

pub fn illiquid(symbol: &str, option_type: OptionType, strike: f64, iv: f64) -> OptionQuote {
    OptionQuote {
        volume: 100,
        ..quote(symbol, option_type, strike, iv)
    }
}
