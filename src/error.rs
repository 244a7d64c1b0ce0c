//! Error types for plan construction and sizing queries.

use thiserror::Error;

/// Errors raised when building a plan or querying it with an invalid state.
///
/// Infeasible plan states are not errors: a factor of `0.0` or a stake of
/// zero is an ordinary return value that callers must check for.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The plan has no trades to run.
    #[error("plan must contain at least one trade")]
    ZeroTrades,

    /// The plan has no win target.
    #[error("plan must target at least one win")]
    ZeroTargetWins,

    /// The payout leaves no room to compound (multiplier at or below 1).
    #[error("payout of {payout_percent}% gives multiplier {multiplier}, which cannot compound")]
    DegenerateMultiplier {
        payout_percent: f64,
        multiplier: f64,
    },

    /// A query referenced a trade index past the end of the plan.
    #[error("trade index {index} is out of range for a {total_trades}-trade plan")]
    TradeIndexOutOfRange { index: u32, total_trades: u32 },

    /// A query claimed more wins than the plan targets.
    #[error("recorded wins {wins} exceed the plan target of {target_wins}")]
    WinsOutOfRange { wins: u32, target_wins: u32 },

    /// An outcome was recorded after the plan already concluded.
    #[error("plan already concluded; no further trades to stake")]
    PlanConcluded,
}
