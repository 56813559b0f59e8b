//! Append-only trade log.
//!
//! The scoring code never touches storage directly; it hands entries to a
//! [`TradeLogSink`]. [`CsvTradeLog`] is the durable implementation and
//! [`MemoryTradeLog`] keeps entries in memory.

use crate::error::Result;
use crate::types::{LogEntry, LOG_HEADER};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for trade log entries.
pub trait TradeLogSink {
    /// Append one entry.
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
}

/// CSV file log. The header row is written when the file is absent or empty.
#[derive(Debug, Clone)]
pub struct CsvTradeLog {
    path: PathBuf,
}

impl CsvTradeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true)
    }
}

impl TradeLogSink for CsvTradeLog {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let write_header = self.needs_header();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            info!("Creating trade log at {}", self.path.display());
            writer.write_record(LOG_HEADER)?;
        }
        writer.serialize(entry)?;
        writer.flush()?;

        debug!(
            "Logged {} {} {} @ {}",
            entry.ticker, entry.expiry, entry.trade_type, entry.strike
        );
        Ok(())
    }
}

/// In-memory log, mainly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryTradeLog {
    entries: Vec<LogEntry>,
}

impl MemoryTradeLog {
    pub fn new() -> Self {
        Self::default()
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
}

impl TradeLogSink for MemoryTradeLog {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}

impl<T: TradeLogSink + ?Sized> TradeLogSink for &mut T {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        (**self).append(entry)
    }
}
