//! Position sizing: the compounding recurrence and the session around it.

mod position_sizer;
mod session;

pub use position_sizer::PositionSizer;
pub use session::{PlanSession, PlanStatus};
