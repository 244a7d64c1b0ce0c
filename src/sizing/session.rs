//! Plan session: the ledger of executed trades and the sizer around it.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use tracing::debug;
use uuid::Uuid;

use crate::error::PlanError;
use crate::metrics::MetricsCalculator;
use crate::models::{PlanConfig, SessionMetrics, TradeOutcome, TradeRecord};
use crate::sizing::PositionSizer;

/// Where a session stands against its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    /// Trades remain and the target is still reachable
    InProgress,
    /// The target number of wins has been reached
    Achieved,
    /// The wins still needed exceed the trades left
    Failed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::InProgress => "IN PROGRESS",
            PlanStatus::Achieved => "ACHIEVED",
            PlanStatus::Failed => "FAILED",
        }
    }
}

/// One run through a trading plan.
///
/// The session owns the trade ledger and derives the current plan state from
/// it: the trade index is the number of recorded trades, the wins reached
/// are the recorded winners, and the balance is whatever the last trade
/// settled to. The sizer itself holds nothing but its memo table.
pub struct PlanSession {
    config: PlanConfig,
    sizer: PositionSizer,
    initial_capital: Decimal,
    trades: Vec<TradeRecord>,
}

impl PlanSession {
    pub fn new(config: PlanConfig, initial_capital: Decimal) -> Result<Self, PlanError> {
        let sizer = PositionSizer::new(&config)?;
        Ok(Self {
            config,
            sizer,
            initial_capital,
            trades: Vec::new(),
        })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// Number of trades executed so far.
    pub fn trade_index(&self) -> u32 {
        self.trades.len() as u32
    }

    /// Number of winning trades recorded so far.
    pub fn wins_reached(&self) -> u32 {
        self.trades.iter().filter(|t| t.outcome.is_win()).count() as u32
    }

    /// Balance after the last settled trade, or the starting capital.
    pub fn balance(&self) -> Decimal {
        self.trades
            .last()
            .map(|t| t.balance_after)
            .unwrap_or(self.initial_capital)
    }

    pub fn status(&self) -> PlanStatus {
        let wins = self.wins_reached();
        if wins >= self.config.target_wins {
            return PlanStatus::Achieved;
        }
        let wins_needed = self.config.target_wins - wins;
        let trades_left = self.config.total_trades.saturating_sub(self.trade_index());
        if wins_needed > trades_left {
            PlanStatus::Failed
        } else {
            PlanStatus::InProgress
        }
    }

    /// Compounding multiple of a fully successful plan.
    pub fn plan_factor(&mut self) -> f64 {
        self.sizer.plan_factor()
    }

    /// Stake to place on the next trade at the current ledger state.
    pub fn next_stake(&mut self) -> Result<Decimal, PlanError> {
        let trade_index = self.trade_index();
        let wins_reached = self.wins_reached();
        let balance = self.balance();
        self.sizer.stake_amount(trade_index, wins_reached, balance)
    }

    /// Settle the next trade with the given outcome and append it to the
    /// ledger.
    ///
    /// The stake is sized at the current state; a win pays
    /// `stake * (multiplier - 1)` rounded to cents, a loss forfeits the
    /// stake. Fails with [`PlanError::PlanConcluded`] once the plan is no
    /// longer in progress.
    pub fn record_outcome(&mut self, outcome: TradeOutcome) -> Result<TradeRecord, PlanError> {
        if self.status() != PlanStatus::InProgress {
            return Err(PlanError::PlanConcluded);
        }

        let index = self.trade_index();
        let stake = self.next_stake()?;
        let balance = self.balance();

        let pnl = match outcome {
            TradeOutcome::Win => {
                let edge = Decimal::try_from(self.config.multiplier() - 1.0)
                    .unwrap_or(Decimal::ZERO);
                (stake * edge).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            }
            TradeOutcome::Loss => -stake,
        };
        let balance_after = balance + pnl;

        debug!(
            index = index,
            outcome = outcome.as_str(),
            stake = %stake,
            balance = %balance_after,
            "Trade settled"
        );

        let record = TradeRecord {
            id: Uuid::new_v4(),
            index,
            stake,
            outcome,
            pnl,
            balance_after,
            recorded_at: Utc::now(),
        };
        self.trades.push(record.clone());

        let status = self.status();
        if status != PlanStatus::InProgress {
            debug!(status = status.as_str(), "Plan concluded");
        }
        Ok(record)
    }

    /// Replace the plan configuration.
    ///
    /// The sizer is rebuilt with an empty memo table and the ledger is
    /// cleared: factor values computed for one configuration are never
    /// carried into another, and a reshaped plan restarts its sequence.
    pub fn update_plan(&mut self, config: PlanConfig) -> Result<(), PlanError> {
        let sizer = PositionSizer::new(&config)?;
        debug!(
            total_trades = config.total_trades,
            target_wins = config.target_wins,
            payout_percent = config.payout_percent,
            "Plan updated, ledger reset"
        );
        self.config = config;
        self.sizer = sizer;
        self.trades.clear();
        Ok(())
    }

    /// Performance summary over the current ledger.
    pub fn metrics(&self) -> SessionMetrics {
        MetricsCalculator::calculate(self.initial_capital, &self.trades)
    }
}
