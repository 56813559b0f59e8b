//! One analysis run: score a chain and record the top pick.

use crate::error::Result;
use crate::services::scoring::{parse_expiry, ScoringPipeline};
use crate::services::trade_log::TradeLogSink;
use crate::types::{LogEntry, OptionQuote, PriceBar, ScoreOutcome};
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::info;

/// Runs the scoring pipeline and appends the best candidate to a trade log.
pub struct TradeAdvisor<S: TradeLogSink> {
    pipeline: ScoringPipeline,
    sink: S,
}

impl<S: TradeLogSink> TradeAdvisor<S> {
    pub fn new(pipeline: ScoringPipeline, sink: S) -> Self {
        Self { pipeline, sink }
    }

    pub fn pipeline(&self) -> &ScoringPipeline {
        &self.pipeline
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Analyze `ticker` as of now.
    pub fn analyze(
        &mut self,
        ticker: &str,
        history: &[PriceBar],
        chain: &[OptionQuote],
        expiry: &str,
    ) -> Result<ScoreOutcome> {
        let now = Local::now().naive_local();
        self.analyze_at(ticker, history, chain, expiry, now)
    }

    /// Analyze `ticker` as of `now`, which dates both pricing and the log entry.
    pub fn analyze_at(
        &mut self,
        ticker: &str,
        history: &[PriceBar],
        chain: &[OptionQuote],
        expiry: &str,
        now: NaiveDateTime,
    ) -> Result<ScoreOutcome> {
        let today: NaiveDate = now.date();
        let outcome = self.pipeline.score_on(
            history,
            chain,
            expiry,
            self.pipeline.config().risk_free_rate,
            today,
        )?;

        match outcome.top() {
            Some(top) => {
                let entry = LogEntry {
                    timestamp: now,
                    ticker: ticker.to_uppercase(),
                    expiry: parse_expiry(expiry)?,
                    trade_type: top.trade_type,
                    strike: top.strike(),
                    implied_volatility: top.implied_volatility(),
                };
                self.sink.append(&entry)?;
                info!(
                    "{}: {} {} strike {} (IV {:.2}%)",
                    entry.ticker,
                    entry.trade_type,
                    top.contract_symbol(),
                    entry.strike,
                    entry.implied_volatility * 100.0
                );
            }
            None => info!("{}: {}", ticker.to_uppercase(), outcome),
        }

        Ok(outcome)
    }
}
