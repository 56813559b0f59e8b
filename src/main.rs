use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use optscout::services::{load_option_chain, load_price_history};
use optscout::{
    Config, CsvTradeLog, JournalFilter, LogEntry, MemoryTradeLog, OptionType, ScoreOutcome,
    ScoringPipeline, TradeAdvisor, TradeCandidate, TradeJournal,
};
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "optscout")]
#[command(about = "Options trade recommendations from price signals and chain snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an option chain and log the top pick
    Analyze {
        /// Underlying ticker (e.g., "AAPL")
        #[arg(short, long)]
        ticker: String,
        /// Price history CSV (Date,Open,High,Low,Close,Volume)
        #[arg(short, long)]
        prices: PathBuf,
        /// Option chain CSV for a single expiry
        #[arg(short, long)]
        chain: PathBuf,
        /// Expiry date of the chain (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: String,
        /// The chain file holds puts instead of calls
        #[arg(long)]
        puts: bool,
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
        /// Do not append the top pick to the trade log
        #[arg(long)]
        no_log: bool,
    },
    /// Show the trade journal
    Journal {
        /// Only this ticker
        #[arg(long)]
        ticker: Option<String>,
        /// Only this trade type (call or put)
        #[arg(long)]
        trade_type: Option<OptionType>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Write the filtered entries to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print the most recent indicator values
    Indicators {
        /// Price history CSV
        #[arg(short, long)]
        prices: PathBuf,
        /// Number of trailing bars to show
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optscout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            ticker,
            prices,
            chain,
            expiry,
            puts,
            json,
            no_log,
        } => {
            let option_type = if puts { OptionType::Put } else { OptionType::Call };
            let history = load_price_history(&prices)
                .with_context(|| format!("Failed to load price history: {}", prices.display()))?;
            let chain = load_option_chain(&chain, option_type)
                .with_context(|| format!("Failed to load option chain: {}", chain.display()))?;
            info!(
                "Analyzing {} ({} bars, {} contracts, expiry {})",
                ticker.to_uppercase(),
                history.len(),
                chain.len(),
                expiry
            );

            let pipeline = ScoringPipeline::new(config.scoring.clone());
            let outcome = if no_log {
                TradeAdvisor::new(pipeline, MemoryTradeLog::new())
                    .analyze(&ticker, &history, &chain, &expiry)?
            } else {
                TradeAdvisor::new(pipeline, CsvTradeLog::new(&config.trade_log_path))
                    .analyze(&ticker, &history, &chain, &expiry)?
            };

            if json {
                println!("{}", outcome_json(&outcome)?);
            } else {
                print_outcome(&ticker, &outcome);
            }
        }
        Commands::Journal {
            ticker,
            trade_type,
            start,
            end,
            export,
        } => {
            let journal = TradeJournal::load(&config.trade_log_path)?;
            print_journal_facets(&journal);
            let filter = JournalFilter {
                ticker,
                trade_type,
                start,
                end,
            };
            let entries = journal.filter(&filter);
            print_journal(&entries);

            if let Some(path) = export {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                TradeJournal::export_csv(entries.iter().copied(), file)?;
                info!("Exported {} entries to {}", entries.len(), path.display());
            }
        }
        Commands::Indicators { prices, last } => {
            let history = load_price_history(&prices)
                .with_context(|| format!("Failed to load price history: {}", prices.display()))?;
            let pipeline = ScoringPipeline::new(config.scoring.clone());
            let series = pipeline.engine().compute(&history)?;

            println!(
                "{:<20} {:>10} {:>10} {:>8} {:>8} {:>9} {:>9}",
                "Date", "Close", "MA", "Z", "RSI", "MACD", "Signal"
            );
            let skip = history.len().saturating_sub(last);
            for (bar, point) in history.iter().zip(series.points.iter()).skip(skip) {
                let date = chrono::DateTime::from_timestamp_millis(bar.timestamp)
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{:<20} {:>10.2} {:>10} {:>8} {:>8} {:>9} {:>9}",
                    date,
                    bar.close,
                    fmt_opt(point.moving_average, 2),
                    fmt_opt(point.z_score, 2),
                    fmt_opt(point.rsi, 1),
                    fmt_opt(point.macd, 3),
                    fmt_opt(point.macd_signal, 3),
                );
            }
        }
    }

    Ok(())
}

fn outcome_json(outcome: &ScoreOutcome) -> anyhow::Result<String> {
    let value = match outcome {
        ScoreOutcome::Candidates(candidates) => json!({ "candidates": candidates }),
        other => json!({ "message": other.message() }),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn print_outcome(ticker: &str, outcome: &ScoreOutcome) {
    let candidates = match outcome {
        ScoreOutcome::Candidates(c) => c,
        other => {
            println!("{}: {}", ticker.to_uppercase(), other.message().unwrap_or_default());
            return;
        }
    };

    println!("Top {} trade candidates for {}", candidates.len(), ticker.to_uppercase());
    println!(
        "{:<22} {:<5} {:>8} {:>7} {:>7} {:>7} {:>8} {:>8} {:>7} {:>6} {:>6} {:>6} {:>7} {:>9}",
        "Contract", "Type", "Strike", "Last", "Bid", "Ask", "Volume", "OI", "IV", "Delta",
        "Gamma", "Theta", "IV Rank", "Moneyness"
    );
    for candidate in candidates {
        print_candidate(candidate);
    }
}

fn print_candidate(candidate: &TradeCandidate) {
    let o = &candidate.option;
    let q = &o.quote;
    println!(
        "{:<22} {:<5} {:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>8} {:>8} {:>6.2}% {:>6.2} {:>6.2} {:>6.2} {:>6.2}% {:>8.2}%",
        q.contract_symbol,
        candidate.trade_type.to_string(),
        q.strike,
        q.last_price,
        q.bid,
        q.ask,
        q.volume,
        q.open_interest,
        q.implied_volatility * 100.0,
        o.greeks.delta,
        o.greeks.gamma,
        o.greeks.theta,
        o.iv_rank * 100.0,
        o.moneyness * 100.0,
    );
}

fn print_journal(entries: &[&LogEntry]) {
    if entries.is_empty() {
        println!("No trades logged.");
        return;
    }
    println!(
        "{:<20} {:<8} {:<11} {:<5} {:>9} {:>7}",
        "Date", "Ticker", "Expiry", "Type", "Strike", "IV"
    );
    for entry in entries {
        println!(
            "{:<20} {:<8} {:<11} {:<5} {:>9.2} {:>6.2}%",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.ticker,
            entry.expiry,
            entry.trade_type.to_string(),
            entry.strike,
            entry.implied_volatility * 100.0
        );
    }
}

fn print_journal_facets(journal: &TradeJournal) {
    if journal.is_empty() {
        return;
    }
    let types: Vec<String> = journal.trade_types().iter().map(|t| t.to_string()).collect();
    println!("Tickers: {}", journal.tickers().join(", "));
    println!("Trade types: {}", types.join(", "));
    println!();
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}
