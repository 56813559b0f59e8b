//! Options pricing model.
//!
//! Closed-form Black-Scholes Greeks for European options, plus the
//! chain-relative metrics the scoring pipeline filters on:
//! - Delta, Gamma and Theta (per day)
//! - Moneyness
//! - IV rank against a reference IV sample

use crate::error::{Result, ScoutError};
use crate::types::{Greeks, IvRankMethod, OptionType};
use chrono::NaiveDate;
use std::f64::consts::PI;

/// Floor applied to time-to-expiry so same-day and expired contracts stay finite.
pub const MIN_TIME_YEARS: f64 = 1e-6;

/// Days per year used for time-to-expiry and daily theta.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes Greeks calculator.
#[derive(Debug, Clone, Copy)]
pub struct PricingModel {
    /// Risk-free interest rate (annual, as decimal)
    risk_free_rate: f64,
}

impl Default for PricingModel {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl PricingModel {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    // ========== Black-Scholes ==========

    fn d1(&self, spot: f64, strike: f64, time: f64, volatility: f64) -> f64 {
        let r = self.risk_free_rate;
        (f64::ln(spot / strike) + (r + volatility.powi(2) / 2.0) * time) / (volatility * time.sqrt())
    }

    fn d2(&self, d1: f64, volatility: f64, time: f64) -> f64 {
        d1 - volatility * time.sqrt()
    }

    /// Calculate delta, gamma and theta for one contract.
    ///
    /// `time_years` is floored to [`MIN_TIME_YEARS`].
    pub fn calculate_greeks(
        &self,
        spot: f64,
        strike: f64,
        time_years: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Result<Greeks> {
        validate_positive("spot", spot)?;
        validate_positive("strike", strike)?;
        validate_positive("volatility", volatility)?;
        if time_years.is_nan() {
            return Err(ScoutError::invalid("time to expiry is NaN"));
        }

        let time = time_years.max(MIN_TIME_YEARS);
        let d1 = self.d1(spot, strike, time, volatility);
        let d2 = self.d2(d1, volatility, time);
        let r = self.risk_free_rate;
        let discount = (-r * time).exp();
        let sqrt_t = time.sqrt();

        let delta = match option_type {
            OptionType::Call => norm_cdf(d1),
            OptionType::Put => norm_cdf(d1) - 1.0,
        };

        // Gamma (same for calls and puts)
        let gamma = norm_pdf(d1) / (spot * volatility * sqrt_t);

        let decay = -(spot * norm_pdf(d1) * volatility) / (2.0 * sqrt_t);
        let carry = match option_type {
            OptionType::Call => -r * strike * discount * norm_cdf(d2),
            OptionType::Put => r * strike * discount * norm_cdf(-d2),
        };
        let theta = (decay + carry) / DAYS_PER_YEAR;

        Ok(Greeks::new(delta, gamma, theta))
    }
}

/// Signed distance of the strike from spot as a fraction of spot.
pub fn moneyness(spot: f64, strike: f64) -> Result<f64> {
    validate_positive("spot", spot)?;
    Ok((spot - strike) / spot)
}

/// Rank `current` within `reference`.
///
/// Percentile: share of reference IVs strictly below `current`.
/// MinMax: position between the reference extremes, 0 when they coincide.
/// An empty reference ranks 0.
pub fn iv_rank(current: f64, reference: &[f64], method: IvRankMethod) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    match method {
        IvRankMethod::Percentile => {
            let below = reference.iter().filter(|iv| **iv < current).count();
            below as f64 / reference.len() as f64
        }
        IvRankMethod::MinMax => {
            let min = reference.iter().copied().fold(f64::INFINITY, f64::min);
            let max = reference.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max - min <= 0.0 {
                0.0
            } else {
                ((current - min) / (max - min)).clamp(0.0, 1.0)
            }
        }
    }
}

/// Years from `today` until `expiry`, floored to [`MIN_TIME_YEARS`].
pub fn time_to_expiry(expiry: NaiveDate, today: NaiveDate) -> f64 {
    let days = (expiry - today).num_days() as f64;
    (days / DAYS_PER_YEAR).max(MIN_TIME_YEARS)
}

/// Standard normal cumulative distribution function.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / 2.0_f64.sqrt()))
}

/// Standard normal probability density function.
pub fn norm_pdf(x: f64) -> f64 {
    (-x.powi(2) / 2.0).exp() / (2.0 * PI).sqrt()
}

fn validate_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScoutError::invalid(format!("{} must be positive, got {}", name, value)))
    }
}

/// Error function approximation (Abramowitz and Stegun 7.1.26).
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_model() -> PricingModel {
        PricingModel::new(0.01)
    }

    #[test]
    fn test_atm_call_reference_values() {
        let greeks = setup_model()
            .calculate_greeks(100.0, 100.0, 0.25, 0.20, OptionType::Call)
            .unwrap();

        assert!((greeks.delta - 0.5299).abs() < 1e-3);
        assert!((greeks.gamma - 0.0398).abs() < 1e-3);
        assert!((greeks.theta - (-0.02314)).abs() < 1e-3);
    }

    #[test]
    fn test_put_call_delta_parity() {
        let model = setup_model();
        for strike in [80.0, 95.0, 100.0, 110.0, 130.0] {
            let call = model
                .calculate_greeks(100.0, strike, 0.5, 0.3, OptionType::Call)
                .unwrap();
            let put = model
                .calculate_greeks(100.0, strike, 0.5, 0.3, OptionType::Put)
                .unwrap();
            assert!((call.delta - put.delta - 1.0).abs() < 1e-12);
            assert_eq!(call.gamma, put.gamma);
        }
    }

    #[test]
    fn test_delta_monotone_in_spot() {
        let model = setup_model();
        let mut prev_call = f64::NEG_INFINITY;
        let mut prev_put_abs = f64::INFINITY;
        for spot in (60..=140).step_by(5).map(f64::from) {
            let call = model
                .calculate_greeks(spot, 100.0, 0.25, 0.25, OptionType::Call)
                .unwrap();
            let put = model
                .calculate_greeks(spot, 100.0, 0.25, 0.25, OptionType::Put)
                .unwrap();
            assert!(call.delta > prev_call);
            assert!(put.delta.abs() < prev_put_abs);
            prev_call = call.delta;
            prev_put_abs = put.delta.abs();
        }
    }

    #[test]
    fn test_theta_negative() {
        let model = setup_model();
        let call = model
            .calculate_greeks(100.0, 100.0, 1.0, 0.2, OptionType::Call)
            .unwrap();
        let put = model
            .calculate_greeks(100.0, 100.0, 1.0, 0.2, OptionType::Put)
            .unwrap();
        assert!(call.theta < 0.0);
        assert!(put.theta < 0.0);
    }

    #[test]
    fn test_expired_contract_is_finite() {
        let greeks = setup_model()
            .calculate_greeks(100.0, 105.0, -0.5, 0.2, OptionType::Call)
            .unwrap();
        assert!(greeks.delta.is_finite());
        assert!(greeks.gamma.is_finite());
        assert!(greeks.theta.is_finite());
        assert!(greeks.delta < 1e-6);
    }

    #[test]
    fn test_invalid_inputs() {
        let model = setup_model();
        assert!(model
            .calculate_greeks(-100.0, 100.0, 1.0, 0.2, OptionType::Call)
            .is_err());
        assert!(model
            .calculate_greeks(100.0, 0.0, 1.0, 0.2, OptionType::Call)
            .is_err());
        assert!(model
            .calculate_greeks(100.0, 100.0, 1.0, 0.0, OptionType::Put)
            .is_err());
        assert!(model
            .calculate_greeks(100.0, 100.0, 1.0, f64::NAN, OptionType::Put)
            .is_err());
    }

    #[test]
    fn test_moneyness() {
        assert!((moneyness(100.0, 110.0).unwrap() - (-0.1)).abs() < 1e-12);
        assert!((moneyness(100.0, 90.0).unwrap() - 0.1).abs() < 1e-12);
        assert!(moneyness(0.0, 90.0).is_err());
    }

    #[test]
    fn test_iv_rank_percentile() {
        let reference = [0.2, 0.3, 0.4, 0.5];
        assert_eq!(iv_rank(0.2, &reference, IvRankMethod::Percentile), 0.0);
        assert_eq!(iv_rank(0.4, &reference, IvRankMethod::Percentile), 0.5);
        assert_eq!(iv_rank(0.9, &reference, IvRankMethod::Percentile), 1.0);
        assert_eq!(iv_rank(0.4, &[], IvRankMethod::Percentile), 0.0);
    }

    #[test]
    fn test_iv_rank_min_max() {
        let reference = [0.2, 0.3, 0.4, 0.6];
        assert!((iv_rank(0.4, &reference, IvRankMethod::MinMax) - 0.5).abs() < 1e-12);
        assert_eq!(iv_rank(0.3, &[0.3, 0.3], IvRankMethod::MinMax), 0.0);
    }

    #[test]
    fn test_time_to_expiry() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!((time_to_expiry(expiry, today) - 30.0 / 365.0).abs() < 1e-12);
        assert_eq!(time_to_expiry(today, today), MIN_TIME_YEARS);
        assert_eq!(time_to_expiry(today, expiry), MIN_TIME_YEARS);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((norm_cdf(1.0) + norm_cdf(-1.0) - 1.0).abs() < 1e-7);
        assert!((norm_cdf(1.96) - 0.975).abs() < 1e-3);
    }
}
