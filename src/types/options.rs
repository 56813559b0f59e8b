use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option type (Call or Put).
///
/// Also used as the directional label attached to trade candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at strike price
    Call,
    /// Right to sell at strike price
    Put,
}

impl OptionType {
    /// Whether the contract is in the money at the given spot.
    pub fn is_in_the_money(&self, spot: f64, strike: f64) -> bool {
        match self {
            OptionType::Call => spot > strike,
            OptionType::Put => spot < strike,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "calls" | "c" => Ok(OptionType::Call),
            "put" | "puts" | "p" => Ok(OptionType::Put),
            other => Err(format!("unknown option type '{}'", other)),
        }
    }
}

/// How a contract's IV is ranked against the rest of its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvRankMethod {
    /// Fraction of the reference IVs strictly below the current IV.
    #[default]
    Percentile,
    /// (iv - min) / (max - min) over the reference IVs.
    MinMax,
}

impl FromStr for IvRankMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentile" | "rank" => Ok(IvRankMethod::Percentile),
            "min_max" | "minmax" => Ok(IvRankMethod::MinMax),
            other => Err(format!("unknown IV rank method '{}'", other)),
        }
    }
}

/// Greeks for a single contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeks {
    /// Price sensitivity to underlying price change (dV/dS)
    pub delta: f64,
    /// Rate of change of delta (d²V/dS²)
    pub gamma: f64,
    /// Time decay per day (dV/dt)
    pub theta: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64) -> Self {
        Self { delta, gamma, theta }
    }
}

/// A listed contract from an options chain snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuote {
    /// Contract symbol (e.g., "AAPL240119C00150000")
    pub contract_symbol: String,
    pub option_type: OptionType,
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    pub volume: u64,
    pub open_interest: u64,
    /// Implied volatility (as decimal, e.g., 0.25 = 25%)
    pub implied_volatility: f64,
    /// Snapshot ITM flag; `None` when the source omits it.
    #[serde(default)]
    pub in_the_money: Option<bool>,
}

impl OptionQuote {
    /// Relative bid/ask spread, or `None` when there is no ask to divide by.
    pub fn spread_ratio(&self) -> Option<f64> {
        if self.ask > 0.0 {
            Some((self.ask - self.bid) / self.ask)
        } else {
            None
        }
    }

    /// The snapshot flag, or the ITM test against `spot` when it is missing.
    pub fn in_the_money_at(&self, spot: f64) -> bool {
        self.in_the_money
            .unwrap_or_else(|| self.option_type.is_in_the_money(spot, self.strike))
    }
}

/// A quote enriched with model output for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOption {
    #[serde(flatten)]
    pub quote: OptionQuote,
    pub moneyness: f64,
    #[serde(flatten)]
    pub greeks: Greeks,
    pub iv_rank: f64,
}

/// A priced option that survived every filter, tagged with the trade direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCandidate {
    #[serde(flatten)]
    pub option: PricedOption,
    pub trade_type: OptionType,
}

impl TradeCandidate {
    pub fn contract_symbol(&self) -> &str {
        &self.option.quote.contract_symbol
    }

    pub fn strike(&self) -> f64 {
        self.option.quote.strike
    }

    pub fn implied_volatility(&self) -> f64 {
        self.option.quote.implied_volatility
    }
}

/// Result of one scoring run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    /// Ranked candidates, best first.
    Candidates(Vec<TradeCandidate>),
    /// The price signal sat inside the neutral band.
    NoStrongSignal,
    /// A signal fired but no contract passed the filters.
    NoValidOptions,
}

impl ScoreOutcome {
    pub const NO_STRONG_SIGNAL: &'static str = "no strong signal";
    pub const NO_VALID_OPTIONS: &'static str = "no valid options found";

    /// Ranked candidates, or an empty slice for the terminal outcomes.
    pub fn candidates(&self) -> &[TradeCandidate] {
        match self {
            ScoreOutcome::Candidates(c) => c,
            _ => &[],
        }
    }

    /// Top-ranked candidate, if any.
    pub fn top(&self) -> Option<&TradeCandidate> {
        self.candidates().first()
    }

    /// Informational message for the terminal outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ScoreOutcome::Candidates(_) => None,
            ScoreOutcome::NoStrongSignal => Some(Self::NO_STRONG_SIGNAL),
            ScoreOutcome::NoValidOptions => Some(Self::NO_VALID_OPTIONS),
        }
    }
}

impl fmt::Display for ScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreOutcome::Candidates(c) => write!(f, "{} candidate(s)", c.len()),
            other => write!(f, "{}", other.message().unwrap_or_default()),
        }
    }
}
