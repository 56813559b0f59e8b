//! CSV loaders for price history and option chain snapshots.
//!
//! Column names follow the common market-data export layout
//! (`Date,Open,High,Low,Close,Volume` and
//! `contractSymbol,strike,lastPrice,bid,ask,volume,openInterest,impliedVolatility,inTheMoney`).
//! Unknown columns are ignored.

use crate::error::{Result, ScoutError};
use crate::services::scoring::{validate_chain, validate_history};
use crate::types::{OptionQuote, OptionType, PriceBar};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(rename = "Date", alias = "Datetime", alias = "date", alias = "timestamp")]
    date: String,
    #[serde(rename = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(rename = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(rename = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(rename = "Close", alias = "close")]
    close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainRecord {
    contract_symbol: String,
    strike: f64,
    #[serde(default)]
    last_price: Option<f64>,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    open_interest: Option<f64>,
    implied_volatility: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    in_the_money: Option<bool>,
}

/// Load and validate a price history CSV.
pub fn load_price_history(path: impl AsRef<Path>) -> Result<Vec<PriceBar>> {
    let path = path.as_ref();
    debug!("Loading price history from {}", path.display());
    let reader = csv::Reader::from_path(path)?;
    read_records_into_history(reader)
}

/// Read and validate a price history CSV from any reader.
pub fn read_price_history<R: io::Read>(reader: R) -> Result<Vec<PriceBar>> {
    read_records_into_history(csv::Reader::from_reader(reader))
}

fn read_records_into_history<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<PriceBar>> {
    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<PriceRecord>().enumerate() {
        let record = record?;
        let timestamp = parse_timestamp(&record.date).ok_or_else(|| {
            ScoutError::invalid(format!("row {}: unrecognised date '{}'", row + 1, record.date))
        })?;
        // Close-only exports leave the bar flat at the close
        let close = record.close;
        bars.push(PriceBar {
            timestamp,
            open: record.open.unwrap_or(close),
            high: record.high.unwrap_or(close),
            low: record.low.unwrap_or(close),
            close,
            volume: record.volume.unwrap_or(0.0),
        });
    }
    validate_history(&bars)?;
    debug!("Loaded {} price bars", bars.len());
    Ok(bars)
}

/// Load and validate an option chain CSV holding one type of contract.
pub fn load_option_chain(path: impl AsRef<Path>, option_type: OptionType) -> Result<Vec<OptionQuote>> {
    let path = path.as_ref();
    debug!("Loading {} chain from {}", option_type, path.display());
    let reader = csv::Reader::from_path(path)?;
    read_records_into_chain(reader, option_type)
}

/// Read and validate an option chain CSV from any reader.
pub fn read_option_chain<R: io::Read>(reader: R, option_type: OptionType) -> Result<Vec<OptionQuote>> {
    read_records_into_chain(csv::Reader::from_reader(reader), option_type)
}

fn read_records_into_chain<R: io::Read>(
    mut reader: csv::Reader<R>,
    option_type: OptionType,
) -> Result<Vec<OptionQuote>> {
    let mut chain = Vec::new();
    for record in reader.deserialize::<ChainRecord>() {
        let record = record?;
        if record.in_the_money.is_none() {
            debug!(
                "{} has no inTheMoney flag; resolved against spot when scored",
                record.contract_symbol
            );
        }
        chain.push(OptionQuote {
            option_type,
            strike: record.strike,
            bid: record.bid.unwrap_or(0.0),
            ask: record.ask.unwrap_or(0.0),
            last_price: record.last_price.unwrap_or(0.0),
            volume: to_count(&record.contract_symbol, "volume", record.volume)?,
            open_interest: to_count(&record.contract_symbol, "openInterest", record.open_interest)?,
            implied_volatility: record.implied_volatility,
            in_the_money: record.in_the_money,
            contract_symbol: record.contract_symbol,
        });
    }
    validate_chain(&chain)?;
    debug!("Loaded {} contracts", chain.len());
    Ok(chain)
}

/// Parse the timestamp layouts market-data exports use, returning Unix ms.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Counts arrive as floats (`1234.0`) or blanks; blanks read as zero.
fn to_count(symbol: &str, field: &str, value: Option<f64>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(v) if v.is_nan() => Ok(0),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v.round() as u64),
        Some(v) => Err(ScoutError::invalid(format!("{} has invalid {} {}", symbol, field, v))),
    }
}

fn deserialize_flag<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<bool>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid flag '{}'", other))),
        },
    }
}
