use crate::types::OptionType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the trade log.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row of the trade log.
pub const LOG_HEADER: [&str; 6] = ["Date", "Ticker", "Expiry", "Trade Type", "Strike", "IV"];

/// One audit row per analysis run: the top-ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "Date", with = "log_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Expiry")]
    pub expiry: NaiveDate,
    #[serde(rename = "Trade Type")]
    pub trade_type: OptionType,
    #[serde(rename = "Strike")]
    pub strike: f64,
    #[serde(rename = "IV")]
    pub implied_volatility: f64,
}

/// Optional criteria for narrowing the journal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalFilter {
    pub ticker: Option<String>,
    pub trade_type: Option<OptionType>,
    /// Inclusive lower bound on the entry date.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on the entry date.
    pub end: Option<NaiveDate>,
}

impl JournalFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(ref ticker) = self.ticker {
            if !entry.ticker.eq_ignore_ascii_case(ticker) {
                return false;
            }
        }
        if let Some(trade_type) = self.trade_type {
            if entry.trade_type != trade_type {
                return false;
            }
        }
        let day = entry.timestamp.date();
        if self.start.is_some_and(|start| day < start) {
            return false;
        }
        if self.end.is_some_and(|end| day > end) {
            return false;
        }
        true
    }
}

mod log_timestamp {
    use super::LOG_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(LOG_TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), LOG_TIMESTAMP_FORMAT)
            .map_err(serde::de::Error::custom)
    }
}
