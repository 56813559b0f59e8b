pub mod advisor;
pub mod indicators;
pub mod journal;
pub mod loader;
pub mod options;
pub mod scoring;
pub mod trade_log;

pub use advisor::TradeAdvisor;
pub use indicators::IndicatorEngine;
pub use journal::TradeJournal;
pub use loader::{load_option_chain, load_price_history, read_option_chain, read_price_history};
pub use options::PricingModel;
pub use scoring::ScoringPipeline;
pub use trade_log::{CsvTradeLog, MemoryTradeLog, TradeLogSink};
