//! Simulation harness for trading plans.
//!
//! Replays a fixed win/loss sequence, or random draws at a given win
//! probability, through a plan session and summarizes how the account
//! compounded against the plan's theoretical factor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::PlanError;
use crate::models::{PlanConfig, SessionMetrics, TradeOutcome, TradeRecord};
use crate::sizing::{PlanSession, PlanStatus};

/// Replays outcome sequences through fresh plan sessions.
pub struct Simulator {
    config: PlanConfig,
    initial_capital: Decimal,
}

impl Simulator {
    pub fn new(config: PlanConfig, initial_capital: Decimal) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            config,
            initial_capital,
        })
    }

    /// Run the plan against a fixed outcome sequence.
    ///
    /// Outcomes past the plan's conclusion are ignored; a sequence shorter
    /// than the plan simply leaves it unfinished.
    pub fn run_sequence(&self, outcomes: &[TradeOutcome]) -> Result<SimulationResults, PlanError> {
        let mut session = PlanSession::new(self.config.clone(), self.initial_capital)?;
        for &outcome in outcomes {
            if session.status() != PlanStatus::InProgress {
                break;
            }
            session.record_outcome(outcome)?;
        }
        Ok(self.results(session))
    }

    /// Run the plan on random outcomes drawn at `win_probability`.
    ///
    /// A seed makes the draw reproducible; without one the generator is
    /// seeded from the OS.
    pub fn run_random(
        &self,
        win_probability: f64,
        seed: Option<u64>,
    ) -> Result<SimulationResults, PlanError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let p = win_probability.clamp(0.0, 1.0);

        let mut session = PlanSession::new(self.config.clone(), self.initial_capital)?;
        while session.status() == PlanStatus::InProgress {
            let outcome = if rng.gen_bool(p) {
                TradeOutcome::Win
            } else {
                TradeOutcome::Loss
            };
            debug!(outcome = outcome.as_str(), "Drew outcome");
            session.record_outcome(outcome)?;
        }
        Ok(self.results(session))
    }

    fn results(&self, mut session: PlanSession) -> SimulationResults {
        let plan_factor = session.plan_factor();
        let final_balance = session.balance();
        let realized_factor = match (final_balance.to_f64(), self.initial_capital.to_f64()) {
            (Some(balance), Some(capital)) if capital != 0.0 => balance / capital,
            _ => 0.0,
        };
        let achieved = session.status() == PlanStatus::Achieved;
        let metrics = session.metrics();

        info!(
            achieved = achieved,
            trades = session.trade_index(),
            final_balance = %final_balance,
            "Simulation finished"
        );

        SimulationResults {
            config: self.config.clone(),
            initial_capital: self.initial_capital,
            final_balance,
            realized_factor,
            plan_factor,
            achieved,
            wins: session.wins_reached(),
            losses: session.trade_index() - session.wins_reached(),
            metrics,
            trades: session.trades().to_vec(),
        }
    }
}

/// Outcome of one simulated run through a plan.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResults {
    /// Plan shape the run used
    pub config: PlanConfig,

    /// Starting capital
    pub initial_capital: Decimal,

    /// Balance after the last settled trade
    pub final_balance: Decimal,

    /// Final balance over starting capital
    pub realized_factor: f64,

    /// Theoretical compounding multiple of a successful plan
    pub plan_factor: f64,

    /// Whether the win target was reached
    pub achieved: bool,

    /// Winning trades
    pub wins: u32,

    /// Losing trades
    pub losses: u32,

    /// Performance summary over the run's ledger
    pub metrics: SessionMetrics,

    /// All settled trades in order
    pub trades: Vec<TradeRecord>,
}

impl std::fmt::Display for SimulationResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{:=^56}", " PLAN SIMULATION ")?;
        writeln!(f)?;
        writeln!(
            f,
            "Plan: {} trades, {} wins targeted, {}% payout",
            self.config.total_trades, self.config.target_wins, self.config.payout_percent
        )?;
        writeln!(f)?;
        writeln!(f, "--- Capital ---")?;
        writeln!(f, "Initial:      ${:.2}", self.initial_capital)?;
        writeln!(f, "Final:        ${:.2}", self.final_balance)?;
        writeln!(f, "Realized:     {:.4}x", self.realized_factor)?;
        writeln!(f, "Plan factor:  {:.4}x", self.plan_factor)?;
        writeln!(f)?;
        writeln!(f, "--- Trades ---")?;
        writeln!(
            f,
            "Outcome:      {}",
            if self.achieved { "ACHIEVED" } else { "FAILED" }
        )?;
        writeln!(f, "Executed:     {}", self.trades.len())?;
        writeln!(f, "Winners:      {}", self.wins)?;
        writeln!(f, "Losers:       {}", self.losses)?;
        writeln!(f, "Total staked: ${:.2}", self.metrics.total_staked)?;
        writeln!(f, "Max drawdown: {:.2}%", self.metrics.max_drawdown * 100.0)?;
        write!(f, "{:=^56}", "")
    }
}
