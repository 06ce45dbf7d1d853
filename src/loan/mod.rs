//! Loan data structures and input loading

mod data;
pub mod loader;

pub use data::LoanParameters;
pub use loader::{load_loan, load_loan_from_reader, parse_issue_date};

#[cfg(test)]
pub(crate) use data::reference_loan;
