//! Scoring pipeline scenarios

mod common;

use common::*;
use optscout::services::read_option_chain;
use optscout::services::scoring::ScoringPipeline;
use optscout::{OptionQuote, OptionType, PricingModel, ScoreOutcome, ScoringConfig};

fn call_chain_with_rank_point_three() -> Vec<OptionQuote> {
    let mut chain = vec![
        illiquid("L1", OptionType::Call, 105.0, 0.20),
        illiquid("L2", OptionType::Call, 106.0, 0.22),
        illiquid("L3", OptionType::Call, 107.0, 0.24),
        quote("TARGET", OptionType::Call, 113.0, 0.30),
    ];
    for (i, iv) in [0.32, 0.34, 0.36, 0.38, 0.40, 0.42].iter().enumerate() {
        chain.push(illiquid(&format!("H{}", i), OptionType::Call, 115.0 + i as f64, *iv));
    }
    chain
}

#[test]
fn test_upward_signal_yields_single_call() {
    let pipeline = ScoringPipeline::default();
    let outcome = pipeline
        .score_on(
            &history_ending_at(110.0),
            &call_chain_with_rank_point_three(),
            EXPIRY,
            0.01,
            today(),
        )
        .unwrap();

    let candidates = outcome.candidates();
    assert_eq!(candidates.len(), 1);
    let top = &candidates[0];
    assert_eq!(top.contract_symbol(), "TARGET");
    assert_eq!(top.trade_type, OptionType::Call);
    assert!((top.option.iv_rank - 0.3).abs() < 1e-12);
    assert!((top.option.greeks.delta - 0.3973).abs() < 1e-3);
    assert!((top.option.moneyness - (110.0 - 113.0) / 110.0).abs() < 1e-12);
}

#[test]
fn test_neutral_signal_ignores_chain() {
    let pipeline = ScoringPipeline::default();
    let outcome = pipeline
        .score_on(
            &neutral_history(),
            &call_chain_with_rank_point_three(),
            EXPIRY,
            0.01,
            today(),
        )
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoStrongSignal);
    assert_eq!(outcome.to_string(), "no strong signal");

    // Even an empty chain is not inspected without a signal
    let outcome = pipeline
        .score_on(&neutral_history(), &[], EXPIRY, 0.01, today())
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoStrongSignal);
}

#[test]
fn test_short_history_has_no_signal() {
    let pipeline = ScoringPipeline::default();
    let outcome = pipeline
        .score_on(&bars(&[100.0, 120.0]), &[], EXPIRY, 0.01, today())
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoStrongSignal);
}

#[test]
fn test_illiquid_puts_yield_no_valid_options() {
    let pipeline = ScoringPipeline::default();
    let chain: Vec<OptionQuote> = (0..5)
        .map(|i| {
            let mut q = quote(&format!("P{}", i), OptionType::Put, 85.0 + i as f64, 0.3);
            q.volume = 500 - i as u64 * 100;
            q
        })
        .collect();

    let outcome = pipeline
        .score_on(&history_ending_at(90.0), &chain, EXPIRY, 0.01, today())
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoValidOptions);
    assert_eq!(outcome.to_string(), "no valid options found");
}

#[test]
fn test_downward_signal_tags_put() {
    let pipeline = ScoringPipeline::default();
    let chain = vec![quote("P87", OptionType::Put, 87.0, 0.3)];
    let outcome = pipeline
        .score_on(&history_ending_at(90.0), &chain, EXPIRY, 0.01, today())
        .unwrap();

    let top = outcome.top().expect("put candidate");
    assert_eq!(top.trade_type, OptionType::Put);
    assert!((top.option.greeks.delta - (-0.3275)).abs() < 1e-3);
}

#[test]
fn test_ranking_ascending_with_stable_ties() {
    let pipeline = ScoringPipeline::default();
    let chain = vec![
        quote("C112", OptionType::Call, 112.0, 0.34),
        quote("C113", OptionType::Call, 113.0, 0.30),
        quote("C114", OptionType::Call, 114.0, 0.30),
        quote("C115", OptionType::Call, 115.0, 0.28),
        quote("C111", OptionType::Call, 111.0, 0.36),
    ];
    let outcome = pipeline
        .score_on(&history_ending_at(110.0), &chain, EXPIRY, 0.01, today())
        .unwrap();

    let symbols: Vec<&str> = outcome.candidates().iter().map(|c| c.contract_symbol()).collect();
    assert_eq!(symbols, vec!["C115", "C113", "C114"]);
    let ranks: Vec<f64> = outcome.candidates().iter().map(|c| c.option.iv_rank).collect();
    assert_eq!(ranks, vec![0.0, 0.2, 0.2]);
}

#[test]
fn test_zero_ask_is_filtered_not_an_error() {
    let pipeline = ScoringPipeline::default();
    let mut q = quote("C113", OptionType::Call, 113.0, 0.30);
    q.bid = 0.0;
    q.ask = 0.0;
    let outcome = pipeline
        .score_on(&history_ending_at(110.0), &[q], EXPIRY, 0.01, today())
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoValidOptions);
}

#[test]
fn test_tightening_volume_never_adds_candidates() {
    let chain: Vec<OptionQuote> = [600u64, 800, 1000, 1200, 1400]
        .iter()
        .enumerate()
        .map(|(i, volume)| {
            let mut q = quote(&format!("C{}", i), OptionType::Call, 111.0 + i as f64, 0.30);
            q.volume = *volume;
            q
        })
        .collect();
    let history = history_ending_at(110.0);

    let mut previous = usize::MAX;
    for min_volume in [500u64, 700, 900, 1100, 1300, 1500] {
        let pipeline = ScoringPipeline::new(ScoringConfig {
            min_volume,
            top_n: usize::MAX,
            ..ScoringConfig::default()
        });
        let count = pipeline
            .score_on(&history, &chain, EXPIRY, 0.01, today())
            .unwrap()
            .candidates()
            .len();
        assert!(count <= previous, "min_volume {} grew survivors", min_volume);
        previous = count;
    }
    assert_eq!(previous, 0);
}

#[test]
fn test_tightening_spread_never_adds_candidates() {
    let chain: Vec<OptionQuote> = [1.95, 1.85, 1.75, 1.65]
        .iter()
        .enumerate()
        .map(|(i, bid)| {
            let mut q = quote(&format!("C{}", i), OptionType::Call, 111.0 + i as f64, 0.30);
            q.bid = *bid;
            q
        })
        .collect();
    let history = history_ending_at(110.0);

    let mut previous = usize::MAX;
    for max_spread_ratio in [0.20, 0.15, 0.10, 0.05, 0.01] {
        let pipeline = ScoringPipeline::new(ScoringConfig {
            max_spread_ratio,
            top_n: usize::MAX,
            ..ScoringConfig::default()
        });
        let count = pipeline
            .score_on(&history, &chain, EXPIRY, 0.01, today())
            .unwrap()
            .candidates()
            .len();
        assert!(count <= previous);
        previous = count;
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let pipeline = ScoringPipeline::default();
    let history = history_ending_at(110.0);
    let chain = vec![
        quote("C112", OptionType::Call, 112.0, 0.34),
        quote("C113", OptionType::Call, 113.0, 0.30),
        quote("C114", OptionType::Call, 114.0, 0.30),
    ];

    let first = pipeline.score_on(&history, &chain, EXPIRY, 0.01, today()).unwrap();
    let second = pipeline.score_on(&history, &chain, EXPIRY, 0.01, today()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(first.candidates()).unwrap(),
        serde_json::to_string(second.candidates()).unwrap()
    );
}

#[test]
fn test_min_max_iv_rank_method() {
    let pipeline = ScoringPipeline::new(ScoringConfig {
        iv_rank_method: optscout::IvRankMethod::MinMax,
        ..ScoringConfig::default()
    });
    let chain = vec![
        quote("C112", OptionType::Call, 112.0, 0.40),
        quote("C113", OptionType::Call, 113.0, 0.30),
        quote("C114", OptionType::Call, 114.0, 0.20),
    ];
    let outcome = pipeline
        .score_on(&history_ending_at(110.0), &chain, EXPIRY, 0.01, today())
        .unwrap();
    // The highest IV maps to 1.0 and falls outside the IV rank ceiling
    let symbols: Vec<&str> = outcome.candidates().iter().map(|c| c.contract_symbol()).collect();
    assert_eq!(symbols, vec!["C114", "C113"]);
    let ranks: Vec<f64> = outcome.candidates().iter().map(|c| c.option.iv_rank).collect();
    assert!(ranks[0].abs() < 1e-12);
    assert!((ranks[1] - 0.5).abs() < 1e-9);
}

#[test]
fn test_input_errors() {
    let pipeline = ScoringPipeline::default();
    let chain = vec![quote("C113", OptionType::Call, 113.0, 0.30)];

    let err = pipeline
        .score_on(&[], &chain, EXPIRY, 0.01, today())
        .unwrap_err();
    assert!(err.is_input_error());

    let err = pipeline
        .score_on(&history_ending_at(110.0), &[], EXPIRY, 0.01, today())
        .unwrap_err();
    assert!(err.is_input_error());

    let err = pipeline
        .score_on(&history_ending_at(110.0), &chain, "Feb 1", 0.01, today())
        .unwrap_err();
    assert!(err.is_input_error());

    let bad = vec![quote("C113", OptionType::Call, -5.0, 0.30)];
    let err = pipeline
        .score_on(&history_ending_at(110.0), &bad, EXPIRY, 0.01, today())
        .unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_atm_reference_greeks() {
    let greeks = PricingModel::new(0.01)
        .calculate_greeks(100.0, 100.0, 0.25, 0.2, OptionType::Call)
        .unwrap();
    assert!((greeks.delta - 0.52989).abs() < 1e-3);
    assert!((greeks.gamma - 0.03978).abs() < 1e-3);
}

#[test]
fn test_chain_without_itm_flag_excludes_in_the_money_calls() {
    let csv = "contractSymbol,strike,lastPrice,bid,ask,volume,openInterest,impliedVolatility\n\
               C107,107.0,4.0,3.9,4.1,1000,1000,0.30\n";
    let chain = read_option_chain(csv.as_bytes(), OptionType::Call).unwrap();

    let pipeline = ScoringPipeline::default();
    let outcome = pipeline
        .score_on(&history_ending_at(110.0), &chain, EXPIRY, 0.01, today())
        .unwrap();
    assert_eq!(outcome, ScoreOutcome::NoValidOptions);

    // The same contract out of the money at a higher strike is accepted
    let csv = "contractSymbol,strike,lastPrice,bid,ask,volume,openInterest,impliedVolatility\n\
               C113,113.0,2.0,1.9,2.0,1000,1000,0.30\n";
    let chain = read_option_chain(csv.as_bytes(), OptionType::Call).unwrap();
    let outcome = pipeline
        .score_on(&history_ending_at(110.0), &chain, EXPIRY, 0.01, today())
        .unwrap();
    let top = outcome.top().expect("out-of-the-money call");
    assert_eq!(top.contract_symbol(), "C113");
    assert_eq!(top.option.quote.in_the_money, Some(false));
}

#[test]
fn test_mismatched_chain_view_is_still_tagged_with_bias() {
    let pipeline = ScoringPipeline::default();
    let chain = vec![quote("C93", OptionType::Call, 93.0, 0.30)];
    let outcome = pipeline
        .score_on(&history_ending_at(90.0), &chain, EXPIRY, 0.01, today())
        .unwrap();
    let top = outcome.top().expect("call priced as a call");
    assert_eq!(top.trade_type, OptionType::Put);
    assert_eq!(top.option.quote.option_type, OptionType::Call);
    assert!(top.option.greeks.delta > 0.0);
}
