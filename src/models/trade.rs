//! Trade records for the session ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a single binary-outcome trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeOutcome {
    Win,
    Loss,
}

impl TradeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeOutcome::Win => "WIN",
            TradeOutcome::Loss => "LOSS",
        }
    }

    /// Parse a single-letter outcome code, as used in sequence strings
    /// like `"WLWW"`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(TradeOutcome::Win),
            'L' => Some(TradeOutcome::Loss),
            _ => None,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, TradeOutcome::Win)
    }
}

/// One executed trade in a plan session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique record identifier
    pub id: Uuid,

    /// Position of this trade in the plan, 0-based
    pub index: u32,

    /// Amount staked on the trade
    pub stake: Decimal,

    /// Win or loss
    pub outcome: TradeOutcome,

    /// Realized profit (positive) or loss (negative) on the stake
    pub pnl: Decimal,

    /// Account balance after settling the trade
    pub balance_after: Decimal,

    /// When the outcome was recorded
    pub recorded_at: DateTime<Utc>,
}
