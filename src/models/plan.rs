//! Plan configuration: the shape of a fixed-length compounding plan.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Configuration for a fixed-length trading plan.
///
/// A plan runs for at most `total_trades` binary-outcome trades and concludes
/// successfully once `target_wins` of them are winners. A win on stake `s`
/// pays `s * payout_percent / 100`; a loss forfeits the stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Number of trades in the plan
    pub total_trades: u32,

    /// Wins required for the plan to conclude successfully
    pub target_wins: u32,

    /// Payout percentage on a winning stake (e.g. 80 pays 80% of the stake)
    pub payout_percent: f64,
}

impl PlanConfig {
    pub fn new(total_trades: u32, target_wins: u32, payout_percent: f64) -> Self {
        Self {
            total_trades,
            target_wins,
            payout_percent,
        }
    }

    /// Gross return factor applied to a winning stake.
    pub fn multiplier(&self) -> f64 {
        1.0 + self.payout_percent / 100.0
    }

    /// Check the parameters a sizer requires.
    ///
    /// A target above `total_trades` is allowed: such a plan is unreachable
    /// from the start and yields zero factors and stakes rather than an
    /// error.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.total_trades == 0 {
            return Err(PlanError::ZeroTrades);
        }
        if self.target_wins == 0 {
            return Err(PlanError::ZeroTargetWins);
        }
        let multiplier = self.multiplier();
        // Written as a negated comparison so a NaN payout is also rejected.
        if !(multiplier > 1.0) {
            return Err(PlanError::DegenerateMultiplier {
                payout_percent: self.payout_percent,
                multiplier,
            });
        }
        Ok(())
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            total_trades: 10,
            target_wins: 4,
            payout_percent: 80.0, // 1.8x gross on a win
        }
    }
}
