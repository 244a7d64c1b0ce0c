//! Compounding plan position sizing.
//!
//! Sizes stakes for fixed-length plans of binary-outcome trades so that
//! hitting the win target multiplies the account by the same factor no
//! matter the order the wins and losses arrive in. The engine is a pure,
//! synchronous calculator; the session owns the trade ledger around it.

pub mod error;
pub mod metrics;
pub mod models;
pub mod simulate;
pub mod sizing;

pub use error::PlanError;
pub use metrics::MetricsCalculator;
pub use models::{PlanConfig, SessionMetrics, TradeOutcome, TradeRecord};
pub use simulate::{SimulationResults, Simulator};
pub use sizing::{PlanSession, PlanStatus, PositionSizer};
