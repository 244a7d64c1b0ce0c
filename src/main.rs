//! Compounding plan CLI.
//!
//! Inspect the profile of a fixed-length trading plan, size the stake at a
//! given state, or replay win/loss sequences through the sizing engine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use compound_planner::{PlanConfig, PositionSizer, Simulator, TradeOutcome};

/// Plan compounding CLI.
#[derive(Parser)]
#[command(name = "compound_planner")]
#[command(about = "Size stakes for fixed-length compounding trade plans", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a plan's compounding profile and its all-wins schedule
    Plan {
        /// Number of trades in the plan
        #[arg(short, long, default_value = "10")]
        trades: u32,

        /// Wins required to complete the plan
        #[arg(short, long, default_value = "4")]
        wins: u32,

        /// Payout percentage on a winning stake
        #[arg(short, long, default_value = "80")]
        payout: f64,

        /// Starting capital
        #[arg(short, long, default_value = "100")]
        capital: f64,
    },

    /// Compute the stake for a specific point in a plan
    Stake {
        /// Number of trades in the plan
        #[arg(short, long, default_value = "10")]
        trades: u32,

        /// Wins required to complete the plan
        #[arg(short, long, default_value = "4")]
        wins: u32,

        /// Payout percentage on a winning stake
        #[arg(short, long, default_value = "80")]
        payout: f64,

        /// Trades already executed
        #[arg(short, long)]
        index: u32,

        /// Wins already recorded
        #[arg(short, long, default_value = "0")]
        achieved: u32,

        /// Current account balance
        #[arg(short, long)]
        balance: f64,
    },

    /// Replay a win/loss sequence (or random draws) through a plan
    Simulate {
        /// Number of trades in the plan
        #[arg(short, long, default_value = "10")]
        trades: u32,

        /// Wins required to complete the plan
        #[arg(short, long, default_value = "4")]
        wins: u32,

        /// Payout percentage on a winning stake
        #[arg(short, long, default_value = "80")]
        payout: f64,

        /// Starting capital
        #[arg(short, long, default_value = "100")]
        capital: f64,

        /// Fixed outcome sequence, e.g. "LWWLW" (random draws if omitted)
        #[arg(short, long)]
        outcomes: Option<String>,

        /// Win probability for random draws
        #[arg(long, default_value = "0.55")]
        win_rate: f64,

        /// Seed for reproducible random draws
        #[arg(long)]
        seed: Option<u64>,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Plan {
            trades,
            wins,
            payout,
            capital,
        } => {
            let config = PlanConfig::new(trades, wins, payout);
            let capital = Decimal::try_from(capital)?;
            let mut sizer = PositionSizer::new(&config)?;

            let plan_factor = sizer.plan_factor();
            let first_stake = sizer.stake_amount(0, 0, capital)?;

            println!("\n=== Plan Profile ===");
            println!("Trades:          {}", config.total_trades);
            println!("Target wins:     {}", config.target_wins);
            println!(
                "Payout:          {}%  (multiplier {:.2})",
                config.payout_percent,
                config.multiplier()
            );
            println!("Plan factor:     {:.6}x", plan_factor);
            println!(
                "Projected final: ${:.2}",
                capital * Decimal::try_from(plan_factor).unwrap_or(Decimal::ZERO)
            );
            println!("First stake:     ${}", first_stake);

            // Schedule when every trade wins.
            let simulator = Simulator::new(config.clone(), capital)?;
            let results =
                simulator.run_sequence(&vec![TradeOutcome::Win; config.target_wins as usize])?;

            println!("\n--- All-Wins Schedule ---");
            println!("{:<6} {:>12} {:>12}", "TRADE", "STAKE", "BALANCE");
            for trade in &results.trades {
                println!(
                    "{:<6} {:>12} {:>12}",
                    trade.index + 1,
                    format!("${}", trade.stake),
                    format!("${}", trade.balance_after)
                );
            }
        }

        Commands::Stake {
            trades,
            wins,
            payout,
            index,
            achieved,
            balance,
        } => {
            let config = PlanConfig::new(trades, wins, payout);
            let balance = Decimal::try_from(balance)?;
            let mut sizer = PositionSizer::new(&config)?;

            let factor = sizer.factor(index, achieved)?;
            let fraction = sizer.stake_fraction(index, achieved)?;
            let stake = sizer.stake_amount(index, achieved, balance)?;

            info!(index = index, achieved = achieved, "Sizing state");

            println!("\n=== Stake ===");
            println!("State:           trade {} of {}, {} wins", index, trades, achieved);
            println!("Factor ahead:    {:.6}x", factor);
            println!("Risk fraction:   {:.2}%", fraction * 100.0);
            println!("Stake:           ${}", stake);
            if stake == Decimal::ZERO {
                println!("\nPlan is concluded at this state; nothing to stake.");
            }
        }

        Commands::Simulate {
            trades,
            wins,
            payout,
            capital,
            outcomes,
            win_rate,
            seed,
            json,
        } => {
            let config = PlanConfig::new(trades, wins, payout);
            let capital = Decimal::try_from(capital)?;
            let simulator = Simulator::new(config, capital)?;

            let results = match outcomes {
                Some(sequence) => {
                    let parsed = parse_outcomes(&sequence)?;
                    simulator.run_sequence(&parsed)?
                }
                None => {
                    info!(win_rate = win_rate, seed = ?seed, "Drawing random outcomes");
                    simulator.run_random(win_rate, seed)?
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", results);
            }
        }
    }

    Ok(())
}

/// Parse a sequence string like "WLWW" into outcomes.
fn parse_outcomes(sequence: &str) -> Result<Vec<TradeOutcome>> {
    sequence
        .chars()
        .map(|c| {
            TradeOutcome::from_char(c)
                .ok_or_else(|| anyhow::anyhow!("invalid outcome code '{}': use W or L", c))
        })
        .collect()
}
