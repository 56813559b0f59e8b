//! Trade journal: read-side view of the trade log.

use crate::error::Result;
use crate::types::{JournalFilter, LogEntry, OptionType, LOG_HEADER};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Entries loaded from a trade log.
#[derive(Debug, Clone, Default)]
pub struct TradeJournal {
    entries: Vec<LogEntry>,
}

impl TradeJournal {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Load a trade log. A missing file yields an empty journal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Trade log not found at {}", path.display());
            return Ok(Self::default());
        }
        let journal = Self::from_reader(std::fs::File::open(path)?)?;
        debug!("Loaded {} journal entries from {}", journal.len(), path.display());
        Ok(journal)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let entries = reader
            .deserialize::<LogEntry>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct tickers in first-seen order.
    pub fn tickers(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !tickers.contains(&entry.ticker.as_str()) {
                tickers.push(&entry.ticker);
            }
        }
        tickers
    }

    /// Distinct trade types in first-seen order.
    pub fn trade_types(&self) -> Vec<OptionType> {
        let mut types = Vec::new();
        for entry in &self.entries {
            if !types.contains(&entry.trade_type) {
                types.push(entry.trade_type);
            }
        }
        types
    }

    /// Entries matching `filter`, newest first.
    pub fn filter(&self, filter: &JournalFilter) -> Vec<&LogEntry> {
        let mut matched: Vec<&LogEntry> =
            self.entries.iter().filter(|e| filter.matches(e)).collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }

    /// Write entries as CSV with the trade log header.
    pub fn export_csv<'a, W, I>(entries: I, writer: W) -> Result<()>
    where
        W: io::Write,
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(LOG_HEADER)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}
