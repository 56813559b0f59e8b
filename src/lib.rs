//! optscout - options trade scout
//!
//! Derives a directional bias from price history, prices an option chain with
//! Black-Scholes Greeks, filters it for liquidity and risk, and ranks what is left.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{Config, IndicatorConfig, ScoringConfig};
pub use error::{Result, ScoutError};
pub use services::{
    CsvTradeLog, IndicatorEngine, MemoryTradeLog, PricingModel, ScoringPipeline, TradeAdvisor,
    TradeJournal, TradeLogSink,
};
pub use types::*;
