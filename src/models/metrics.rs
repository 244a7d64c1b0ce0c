//! Session performance metrics: win rate, P&L, drawdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance summary of one plan session's trade ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    // === Basic Statistics ===
    /// Total number of recorded trades
    pub total_trades: u32,

    /// Total amount staked across all trades
    pub total_staked: Decimal,

    /// Net realized P&L
    pub net_pnl: Decimal,

    // === Win/Loss Metrics ===
    /// Number of winning trades
    pub winning_trades: u32,

    /// Number of losing trades
    pub losing_trades: u32,

    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,

    /// Average profit on winning trades
    pub avg_win: Decimal,

    /// Average loss on losing trades (absolute value)
    pub avg_loss: Decimal,

    /// Profit factor (gross profit / gross loss)
    pub profit_factor: f64,

    // === Risk Metrics ===
    /// Highest balance seen, including the starting capital
    pub peak_balance: Decimal,

    /// Maximum drawdown as a fraction of the peak balance (0.0 to 1.0)
    pub max_drawdown: f64,

    /// Sample standard deviation of per-trade returns
    pub return_volatility: f64,
}
