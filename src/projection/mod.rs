//! Cash-flow projection and IRR for a single loan

pub mod annuity;
mod cashflows;
pub mod dates;
mod engine;
mod irr;
mod state;

pub use annuity::{payment, Annuity};
pub use cashflows::{PeriodRecord, ProjectionResult, ProjectionSummary, ScheduledPeriod};
pub use dates::payment_date;
pub use engine::{LoanValuation, ProjectionConfig, ProjectionEngine};
pub use irr::{npv_at_rate, solve_irr, IrrConfig, IrrSolution};
pub use state::WaterfallState;

/// Payment periods per year; coupon and fees accrue monthly
pub const PERIODS_PER_YEAR: u32 = 12;
