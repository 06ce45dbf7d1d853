//! Load loan parameters from a CSV file
//!
//! Column names follow the pricing worksheet layout (`Issue_Date` as
//! `%m/%d/%Y`). One loan is priced per run, so only the first data row
//! is used.

use super::LoanParameters;
use crate::error::{LoanIrrError, LoanIrrResult};
use chrono::NaiveDate;
use csv::Reader;
use log::warn;
use std::path::Path;

/// Date format used by the pricing worksheet
pub const ISSUE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse a worksheet date such as "8/24/2015"
pub fn parse_issue_date(value: &str) -> LoanIrrResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISSUE_DATE_FORMAT).map_err(|e| {
        LoanIrrError::invalid_input("Issue_Date", format!("'{}' is not a {} date: {}", value, ISSUE_DATE_FORMAT, e))
    })
}

fn default_one() -> f64 {
    1.0
}

/// Raw CSV row matching the loan input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Grade")]
    grade: String,
    #[serde(rename = "Issue_Date")]
    issue_date: String,
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "CouponRate")]
    coupon_rate: f64,
    #[serde(rename = "Invested")]
    invested: f64,
    #[serde(rename = "Outstanding_Balance")]
    outstanding_balance: f64,
    #[serde(rename = "Recovery_Rate")]
    recovery_rate: f64,
    #[serde(rename = "Purchase_Premium")]
    purchase_premium: f64,
    #[serde(rename = "Servicing_Fee")]
    servicing_fee: f64,
    #[serde(rename = "Earnout_Fee")]
    earnout_fee: f64,
    #[serde(rename = "Default_Multiplier", default = "default_one")]
    default_multiplier: f64,
    #[serde(rename = "Prepay_Multiplier", default = "default_one")]
    prepay_multiplier: f64,
}

impl CsvRow {
    fn into_loan(self) -> LoanIrrResult<LoanParameters> {
        let loan = LoanParameters {
            issue_date: parse_issue_date(&self.issue_date)?,
            term: self.term,
            grade: self.grade.trim().to_string(),
            coupon_rate: self.coupon_rate,
            invested: self.invested,
            outstanding_balance: self.outstanding_balance,
            recovery_rate: self.recovery_rate,
            purchase_premium: self.purchase_premium,
            servicing_fee: self.servicing_fee,
            earnout_fee: self.earnout_fee,
            default_multiplier: self.default_multiplier,
            prepay_multiplier: self.prepay_multiplier,
        };
        loan.validate()?;
        Ok(loan)
    }
}

/// Load the loan from a CSV file
pub fn load_loan<P: AsRef<Path>>(path: P) -> LoanIrrResult<LoanParameters> {
    let reader = Reader::from_path(path)?;
    read_first_loan(reader)
}

/// Load the loan from any reader (e.g., string buffer, request body)
pub fn load_loan_from_reader<R: std::io::Read>(reader: R) -> LoanIrrResult<LoanParameters> {
    read_first_loan(Reader::from_reader(reader))
}

fn read_first_loan<R: std::io::Read>(mut reader: Reader<R>) -> LoanIrrResult<LoanParameters> {
    let mut rows = reader.deserialize::<CsvRow>();

    let first = match rows.next() {
        Some(row) => row?,
        None => return Err(LoanIrrError::invalid_input("loan file", "contains no data rows")),
    };

    let extra = rows.count();
    if extra > 0 {
        warn!("Loan file has {} additional row(s); only the first loan is priced", extra);
    }

    first.into_loan()
}
