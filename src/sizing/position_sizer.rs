//! The compounding stake recurrence.
//!
//! For a plan of `total_trades` binary-outcome trades targeting
//! `target_wins` winners, the sizer picks each stake so that the account is
//! multiplied by the same overall factor whenever the target is reached,
//! regardless of the order the wins and losses arrive in.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::PlanError;
use crate::models::PlanConfig;

/// Smallest stake the sizer will propose on a live path.
const MIN_STAKE: Decimal = dec!(0.01);

/// Calculator for path-independent stakes over one plan configuration.
///
/// Intermediate factor values are memoized per `(trade_index, wins_reached)`
/// state in a table owned by this instance, so a new configuration always
/// starts from an empty table. Build a fresh sizer whenever the plan shape
/// or payout changes.
pub struct PositionSizer {
    total_trades: u32,
    target_wins: u32,
    multiplier: f64,
    /// Factor memo, indexed `[trade_index][wins_reached]`.
    cache: Vec<Vec<Option<f64>>>,
}

impl PositionSizer {
    /// Create a sizer for the given plan.
    ///
    /// Fails if the plan has no trades, no win target, or a payout that
    /// cannot compound (multiplier at or below 1).
    pub fn new(config: &PlanConfig) -> Result<Self, PlanError> {
        config.validate()?;
        let cache =
            vec![vec![None; config.target_wins as usize + 1]; config.total_trades as usize + 1];
        Ok(Self {
            total_trades: config.total_trades,
            target_wins: config.target_wins,
            multiplier: config.multiplier(),
            cache,
        })
    }

    /// Compounding multiple the account must still achieve from a state,
    /// assuming the plan concludes successfully.
    ///
    /// `1.0` means the target is already met; `0.0` means it can no longer
    /// be reached from here. For states where every remaining trade must be
    /// won, the factor is `multiplier^wins_needed`. Results are memoized, so
    /// repeated queries return bit-identical values without recomputing.
    pub fn factor(&mut self, trade_index: u32, wins_reached: u32) -> Result<f64, PlanError> {
        self.check_state(trade_index, wins_reached)?;
        Ok(self.factor_inner(trade_index as usize, wins_reached as usize))
    }

    /// Factor for the whole plan from its starting state.
    pub fn plan_factor(&mut self) -> f64 {
        self.factor_inner(0, 0)
    }

    /// Fraction of the current balance to risk on the next trade.
    ///
    /// Derived from the subtree factors after a loss (`below`) and after a
    /// win (`diagonal`):
    ///
    /// `ratio = m * diagonal / (below + (m - 1) * diagonal)`
    /// `fraction = 1 - ratio`
    ///
    /// The stake this fraction implies leaves the final compounding factor
    /// identical whichever way the trade settles. When a loss would put the
    /// target out of reach (`below == 0`), the fraction is `1.0`: every
    /// remaining trade must be won anyway, so the whole balance goes on the
    /// line. Terminal states (target met, or unreachable) return `0.0`.
    pub fn stake_fraction(&mut self, trade_index: u32, wins_reached: u32) -> Result<f64, PlanError> {
        self.check_state(trade_index, wins_reached)?;

        let wins_needed = i64::from(self.target_wins) - i64::from(wins_reached);
        let trades_left = i64::from(self.total_trades) - i64::from(trade_index);
        if wins_needed <= 0 || wins_needed > trades_left {
            return Ok(0.0);
        }

        let below = self.factor_inner(trade_index as usize + 1, wins_reached as usize);
        let diagonal = self.factor_inner(trade_index as usize + 1, wins_reached as usize + 1);
        if below == 0.0 {
            return Ok(1.0);
        }

        let ratio = (self.multiplier * diagonal) / (below + (self.multiplier - 1.0) * diagonal);
        Ok((1.0 - ratio).max(0.0))
    }

    /// Money amount to stake on the next trade out of `portfolio`.
    ///
    /// Returns exactly zero at terminal states. On live paths the amount is
    /// rounded to 2 decimal places (midpoint away from zero) and floored at
    /// 0.01 so a required trade is never proposed at zero value.
    pub fn stake_amount(
        &mut self,
        trade_index: u32,
        wins_reached: u32,
        portfolio: Decimal,
    ) -> Result<Decimal, PlanError> {
        let fraction = self.stake_fraction(trade_index, wins_reached)?;
        if fraction == 0.0 {
            return Ok(Decimal::ZERO);
        }

        let raw = Decimal::try_from(fraction).unwrap_or(Decimal::ZERO) * portfolio;
        let rounded = raw
            .max(Decimal::ZERO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Ok(rounded.max(MIN_STAKE))
    }

    fn check_state(&self, trade_index: u32, wins_reached: u32) -> Result<(), PlanError> {
        if trade_index > self.total_trades {
            return Err(PlanError::TradeIndexOutOfRange {
                index: trade_index,
                total_trades: self.total_trades,
            });
        }
        if wins_reached > self.target_wins {
            return Err(PlanError::WinsOutOfRange {
                wins: wins_reached,
                target_wins: self.target_wins,
            });
        }
        Ok(())
    }

    /// Memoized recurrence over validated in-range states.
    fn factor_inner(&mut self, trade_index: usize, wins_reached: usize) -> f64 {
        if let Some(cached) = self.cache[trade_index][wins_reached] {
            return cached;
        }

        let wins_needed = self.target_wins as i64 - wins_reached as i64;
        let trades_left = self.total_trades as i64 - trade_index as i64;

        let value = if wins_needed <= 0 {
            // Target already met: no further growth required.
            1.0
        } else if wins_needed > trades_left {
            // Not enough trades remain even if all of them win.
            0.0
        } else if wins_needed == trades_left {
            // Every remaining trade must be won.
            self.multiplier.powi(wins_needed as i32)
        } else {
            let below = self.factor_inner(trade_index + 1, wins_reached);
            let diagonal = self.factor_inner(trade_index + 1, wins_reached + 1);
            if below == 0.0 && diagonal == 0.0 {
                0.0
            } else {
                // Positive whenever at least one subtree is feasible, since
                // multiplier > 1 and both values are non-negative.
                let denominator = below + (self.multiplier - 1.0) * diagonal;
                debug_assert!(denominator > 0.0);
                (self.multiplier * below * diagonal) / denominator
            }
        };

        self.cache[trade_index][wins_reached] = Some(value);
        value
    }
}
