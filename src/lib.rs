//! Loan IRR - cash-flow projection and pricing for amortizing consumer loans
//!
//! This library provides:
//! - Spreadsheet-compatible payment date sequencing
//! - Level-payment annuity schedules (PMT / IPMT / PPMT)
//! - A monthly waterfall of default, prepayment, recovery, servicing and earnout
//! - Newton-Raphson IRR with an explicit convergence flag
//! - Assumption stress scenarios for a single loan

pub mod error;
pub mod loan;
pub mod assumptions;
pub mod projection;
pub mod pricing;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoanIrrError, LoanIrrResult};
pub use loan::LoanParameters;
pub use assumptions::{AssumptionProvider, AssumptionTables, CurveTable};
pub use projection::{LoanValuation, PeriodRecord, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use pricing::price_loan;
pub use scenario::{ScenarioRunner, Stress};
