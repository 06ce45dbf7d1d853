//! Error types for loan projection and pricing

use thiserror::Error;

/// Which assumption table a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssumptionKind {
    Prepay,
    ChargedOff,
}

impl std::fmt::Display for AssumptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssumptionKind::Prepay => f.write_str("prepay"),
            AssumptionKind::ChargedOff => f.write_str("charged-off"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoanIrrError {
    #[error("Invalid date: {year}-{month:02}-{day:02} cannot be built even after month-end rollover")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Missing assumption: no {table} rate in column '{column}' for month {month}")]
    MissingAssumption {
        table: AssumptionKind,
        column: String,
        month: u32,
    },

    #[error("IRR did not converge: derivative vanished or became non-finite after {iterations} iterations (rate: {rate})")]
    NonConvergent { iterations: u32, rate: f64 },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl LoanIrrError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        LoanIrrError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type LoanIrrResult<T> = Result<T, LoanIrrError>;
