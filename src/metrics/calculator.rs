//! Calculator for session performance metrics: win rate, P&L, drawdown.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use statrs::statistics::Statistics;

use crate::models::{SessionMetrics, TradeOutcome, TradeRecord};

/// Computes a performance summary from a session's trade ledger.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Calculate metrics over the recorded trades.
    ///
    /// `initial_capital` anchors the balance curve for drawdown and return
    /// calculations. An empty ledger yields zeroed metrics.
    pub fn calculate(initial_capital: Decimal, trades: &[TradeRecord]) -> SessionMetrics {
        let mut metrics = SessionMetrics::default();
        if trades.is_empty() {
            return metrics;
        }

        metrics.total_trades = trades.len() as u32;
        metrics.total_staked = trades.iter().map(|t| t.stake).sum();
        metrics.net_pnl = trades.iter().map(|t| t.pnl).sum();

        let (wins, losses): (Vec<&TradeRecord>, Vec<&TradeRecord>) = trades
            .iter()
            .partition(|t| t.outcome == TradeOutcome::Win);

        metrics.winning_trades = wins.len() as u32;
        metrics.losing_trades = losses.len() as u32;
        metrics.win_rate = wins.len() as f64 / trades.len() as f64;

        if !wins.is_empty() {
            metrics.avg_win =
                wins.iter().map(|t| t.pnl).sum::<Decimal>() / Decimal::from(wins.len() as u32);
        }
        if !losses.is_empty() {
            metrics.avg_loss = losses.iter().map(|t| t.pnl.abs()).sum::<Decimal>()
                / Decimal::from(losses.len() as u32);
        }

        let gross_profit: Decimal = wins.iter().map(|t| t.pnl).sum();
        let gross_loss: Decimal = losses.iter().map(|t| t.pnl.abs()).sum();
        if gross_loss > Decimal::ZERO {
            metrics.profit_factor =
                gross_profit.to_f64().unwrap_or(0.0) / gross_loss.to_f64().unwrap_or(1.0);
        }

        Self::calculate_drawdown(&mut metrics, initial_capital, trades);
        Self::calculate_volatility(&mut metrics, initial_capital, trades);

        metrics
    }

    /// Maximum drawdown as a fraction of the running peak balance.
    fn calculate_drawdown(
        metrics: &mut SessionMetrics,
        initial_capital: Decimal,
        trades: &[TradeRecord],
    ) {
        let mut peak = initial_capital;
        let mut max_dd_pct = 0.0f64;

        for trade in trades {
            let balance = trade.balance_after;
            if balance > peak {
                peak = balance;
            }
            if peak > Decimal::ZERO {
                let dd = (peak - balance).to_f64().unwrap_or(0.0) / peak.to_f64().unwrap_or(1.0);
                if dd > max_dd_pct {
                    max_dd_pct = dd;
                }
            }
        }

        metrics.peak_balance = peak;
        metrics.max_drawdown = max_dd_pct;
    }

    /// Sample standard deviation of per-trade returns.
    fn calculate_volatility(
        metrics: &mut SessionMetrics,
        initial_capital: Decimal,
        trades: &[TradeRecord],
    ) {
        if trades.len() < 2 {
            return;
        }

        let mut previous = initial_capital;
        let mut returns = Vec::with_capacity(trades.len());
        for trade in trades {
            if let (Some(pnl), Some(base)) = (trade.pnl.to_f64(), previous.to_f64()) {
                if base != 0.0 {
                    returns.push(pnl / base);
                }
            }
            previous = trade.balance_after;
        }

        if returns.len() >= 2 {
            metrics.return_volatility = returns.std_dev();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn record(index: u32, stake: Decimal, outcome: TradeOutcome, pnl: Decimal, balance_after: Decimal) -> TradeRecord {
        TradeRecord {
            id: Uuid::new_v4(),
            index,
            stake,
            outcome,
            pnl,
            balance_after,
            recorded_at: Utc::now(),
        }
    }

    /// Ledger of the 10-trade, 4-win, 80% payout plan over loss-win-win-win-win.
    fn reference_ledger() -> Vec<TradeRecord> {
        vec![
            record(0, dec!(6.82), TradeOutcome::Loss, dec!(-6.82), dec!(93.18)),
            record(1, dec!(10.23), TradeOutcome::Win, dec!(8.18), dec!(101.36)),
            record(2, dec!(6.90), TradeOutcome::Win, dec!(5.52), dec!(106.88)),
            record(3, dec!(3.55), TradeOutcome::Win, dec!(2.84), dec!(109.72)),
            record(4, dec!(1.07), TradeOutcome::Win, dec!(0.86), dec!(110.58)),
        ]
    }

    #[test]
    fn test_empty_ledger_yields_zeroed_metrics() {
        let metrics = MetricsCalculator::calculate(dec!(100), &[]);
        assert_eq!(metrics.total_trades, 0);
        assert_eq!(metrics.net_pnl, Decimal::ZERO);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
    }

    #[test]
    fn test_win_loss_breakdown() {
        let metrics = MetricsCalculator::calculate(dec!(100), &reference_ledger());
        assert_eq!(metrics.total_trades, 5);
        assert_eq!(metrics.winning_trades, 4);
        assert_eq!(metrics.losing_trades, 1);
        assert!((metrics.win_rate - 0.8).abs() < 1e-12);
        assert_eq!(metrics.total_staked, dec!(28.57));
        assert_eq!(metrics.net_pnl, dec!(10.58));
        assert_eq!(metrics.avg_win, dec!(4.35));
        assert_eq!(metrics.avg_loss, dec!(6.82));
        // 17.40 gross profit against 6.82 gross loss.
        assert!((metrics.profit_factor - 2.551_319_648_093_841_6).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_tracks_running_peak() {
        let metrics = MetricsCalculator::calculate(dec!(100), &reference_ledger());
        assert_eq!(metrics.peak_balance, dec!(110.58));
        // The opening loss dips 6.82 below the 100 starting peak.
        assert!((metrics.max_drawdown - 0.0682).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_positive_for_mixed_ledger() {
        let metrics = MetricsCalculator::calculate(dec!(100), &reference_ledger());
        assert!(metrics.return_volatility > 0.0);
        assert!(metrics.return_volatility.is_finite());
    }

    #[test]
    fn test_profit_factor_zero_without_losses() {
        let trades = vec![
            record(0, dec!(10), TradeOutcome::Win, dec!(8), dec!(108)),
            record(1, dec!(5), TradeOutcome::Win, dec!(4), dec!(112)),
        ];
        let metrics = MetricsCalculator::calculate(dec!(100), &trades);
        assert_eq!(metrics.profit_factor, 0.0);
        assert_eq!(metrics.losing_trades, 0);
        assert_eq!(metrics.max_drawdown, 0.0);
    }
}
