//! Trade scoring pipeline.
//!
//! Turns a price history and one expiry's option chain into at most
//! `top_n` ranked trade candidates:
//! 1. Directional bias from the latest Z-score
//! 2. Greeks, moneyness and IV rank for every contract
//! 3. Liquidity / risk filters
//! 4. Stable ascending sort by IV rank

use crate::config::ScoringConfig;
use crate::error::{Result, ScoutError};
use crate::services::indicators::IndicatorEngine;
use crate::services::options::{iv_rank, moneyness, time_to_expiry, PricingModel};
use crate::types::{OptionQuote, OptionType, PriceBar, PricedOption, ScoreOutcome, TradeCandidate};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Expiry date format accepted by the pipeline.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Scores option chains against a price-derived directional signal.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    config: ScoringConfig,
    engine: IndicatorEngine,
}

impl ScoringPipeline {
    pub fn new(config: ScoringConfig) -> Self {
        let engine = IndicatorEngine::new(config.indicators.clone());
        Self { config, engine }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    /// Score `chain` using today's local date for time-to-expiry.
    pub fn score(
        &self,
        history: &[PriceBar],
        chain: &[OptionQuote],
        expiry: &str,
        risk_free_rate: f64,
    ) -> Result<ScoreOutcome> {
        let today = Local::now().date_naive();
        self.score_on(history, chain, expiry, risk_free_rate, today)
    }

    /// Score `chain` as of `today`.
    pub fn score_on(
        &self,
        history: &[PriceBar],
        chain: &[OptionQuote],
        expiry: &str,
        risk_free_rate: f64,
        today: NaiveDate,
    ) -> Result<ScoreOutcome> {
        let expiry = parse_expiry(expiry)?;
        validate_history(history)?;

        let series = self.engine.compute(history)?;
        let z_score = series.latest_z_score();
        let bias = match self.bias(z_score) {
            Some(bias) => bias,
            None => {
                debug!("No strong signal (z-score {:?})", z_score);
                return Ok(ScoreOutcome::NoStrongSignal);
            }
        };
        debug!("Directional bias {} from z-score {:?}", bias, z_score);

        validate_chain(chain)?;

        let mismatched = chain.iter().filter(|q| q.option_type != bias).count();
        if mismatched > 0 {
            warn!(
                "{} of {} contracts are not {}s but will be tagged {}",
                mismatched,
                chain.len(),
                bias,
                bias
            );
        }

        // validate_history guarantees at least one bar
        let spot = history[history.len() - 1].close;
        let time_years = time_to_expiry(expiry, today);
        let model = PricingModel::new(risk_free_rate);
        let priced = self.price_chain(chain, spot, time_years, &model)?;

        let mut survivors: Vec<PricedOption> =
            priced.into_iter().filter(|p| self.passes_filters(p)).collect();
        debug!(
            "{} of {} contracts passed filters (spot {:.2}, T {:.4}y)",
            survivors.len(),
            chain.len(),
            spot,
            time_years
        );

        if survivors.is_empty() {
            return Ok(ScoreOutcome::NoValidOptions);
        }

        // sort_by is stable: equal ranks keep chain order
        survivors.sort_by(|a, b| a.iv_rank.total_cmp(&b.iv_rank));
        survivors.truncate(self.config.top_n);

        let candidates = survivors
            .into_iter()
            .map(|option| TradeCandidate {
                option,
                trade_type: bias,
            })
            .collect();

        Ok(ScoreOutcome::Candidates(candidates))
    }

    /// Directional bias for a Z-score; `None` inside the neutral band or when undefined.
    pub fn bias(&self, z_score: Option<f64>) -> Option<OptionType> {
        let z = z_score?;
        if z > self.config.z_threshold {
            Some(OptionType::Call)
        } else if z < -self.config.z_threshold {
            Some(OptionType::Put)
        } else {
            None
        }
    }

    /// Price every contract in chain order.
    pub fn price_chain(
        &self,
        chain: &[OptionQuote],
        spot: f64,
        time_years: f64,
        model: &PricingModel,
    ) -> Result<Vec<PricedOption>> {
        let reference: Vec<f64> = chain.iter().map(|q| q.implied_volatility).collect();

        chain
            .iter()
            .map(|quote| -> Result<PricedOption> {
                let greeks = model
                    .calculate_greeks(
                        spot,
                        quote.strike,
                        time_years,
                        quote.implied_volatility,
                        quote.option_type,
                    )
                    .map_err(|e| {
                        ScoutError::invalid(format!("{}: {}", quote.contract_symbol, e))
                    })?;

                let moneyness = moneyness(spot, quote.strike)?;
                let iv_rank = iv_rank(
                    quote.implied_volatility,
                    &reference,
                    self.config.iv_rank_method,
                );

                // Chains without an ITM flag are resolved against spot
                let mut quote = quote.clone();
                quote.in_the_money = Some(quote.in_the_money_at(spot));

                Ok(PricedOption {
                    quote,
                    moneyness,
                    greeks,
                    iv_rank,
                })
            })
            .collect()
    }

    /// Whether a priced contract clears every liquidity and risk threshold.
    pub fn passes_filters(&self, priced: &PricedOption) -> bool {
        let c = &self.config;
        let quote = &priced.quote;
        let abs_delta = priced.greeks.delta.abs();

        // A zero ask has no meaningful spread
        let spread_ok = quote
            .spread_ratio()
            .is_some_and(|ratio| ratio <= c.max_spread_ratio);

        !quote.in_the_money.unwrap_or(false)
            && quote.volume > c.min_volume
            && quote.open_interest > c.min_open_interest
            && priced.iv_rank <= c.max_iv_rank
            && abs_delta >= c.min_abs_delta
            && abs_delta <= c.max_abs_delta
            && priced.moneyness.abs() <= c.max_abs_moneyness
            && spread_ok
    }
}

/// Parse a `YYYY-MM-DD` expiry.
pub fn parse_expiry(expiry: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(expiry.trim(), EXPIRY_FORMAT)
        .map_err(|e| ScoutError::invalid(format!("invalid expiry '{}': {}", expiry, e)))
}

/// Price history must be non-empty and strictly ascending by timestamp.
pub fn validate_history(history: &[PriceBar]) -> Result<()> {
    if history.is_empty() {
        return Err(ScoutError::invalid("price history is empty"));
    }
    if let Some(i) = history
        .windows(2)
        .position(|w| w[1].timestamp <= w[0].timestamp)
    {
        return Err(ScoutError::invalid(format!(
            "price history not strictly ascending at bar {}",
            i + 1
        )));
    }
    Ok(())
}

/// Chain must be non-empty, keyed uniquely by contract symbol, with sane quotes.
pub fn validate_chain(chain: &[OptionQuote]) -> Result<()> {
    if chain.is_empty() {
        return Err(ScoutError::invalid("option chain is empty"));
    }

    let mut seen = HashSet::with_capacity(chain.len());
    for quote in chain {
        if !seen.insert(quote.contract_symbol.as_str()) {
            return Err(ScoutError::invalid(format!(
                "duplicate contract {}",
                quote.contract_symbol
            )));
        }
        for (name, value) in [
            ("bid", quote.bid),
            ("ask", quote.ask),
            ("lastPrice", quote.last_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoutError::invalid(format!(
                    "{} has invalid {} {}",
                    quote.contract_symbol, name, value
                )));
            }
        }
    }
    Ok(())
}
