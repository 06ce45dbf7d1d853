//! Payment date sequencing with spreadsheet `DATE()` overflow semantics
//!
//! A day past the end of the target month spills into the following month
//! instead of clamping: 31 January plus one month is 3 March in a
//! non-leap year, exactly as `=DATE(2015, 2, 31)` evaluates.

use chrono::{Datelike, NaiveDate};

use crate::error::{LoanIrrError, LoanIrrResult};

/// Date of payment `period` months after issue (period 0 is the issue date)
pub fn payment_date(issue_date: NaiveDate, period: u32) -> LoanIrrResult<NaiveDate> {
    let months = issue_date.month0() + period;
    let year = issue_date.year() + (months / 12) as i32;
    let month = months % 12 + 1;

    spreadsheet_date(year, month, issue_date.day())
}

/// Build (year, month, day), rolling excess days into later months
pub fn spreadsheet_date(year: i32, month: u32, day: u32) -> LoanIrrResult<NaiveDate> {
    let invalid = || LoanIrrError::InvalidDate { year, month, day };

    if day == 0 || !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let (mut y, mut m, mut d) = (year, month, day);
    loop {
        let days = days_in_month(y, m).ok_or_else(invalid)?;
        if d <= days {
            break;
        }
        d -= days;
        if m == 12 {
            y += 1;
            m = 1;
        } else {
            m += 1;
        }
    }

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid)
}

/// Number of days in a calendar month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_zero_is_issue_date() {
        assert_eq!(payment_date(ymd(2015, 8, 24), 0).unwrap(), ymd(2015, 8, 24));
    }

    #[test]
    fn test_month_end_spills_into_next_month() {
        // Feb 31 2015 -> 3 days past Feb 28
        assert_eq!(payment_date(ymd(2015, 1, 31), 1).unwrap(), ymd(2015, 3, 3));
        // Nov 31 -> Dec 1
        assert_eq!(payment_date(ymd(2015, 10, 31), 1).unwrap(), ymd(2015, 12, 1));
        // Leap year: Feb 30 2016 -> Mar 1
        assert_eq!(payment_date(ymd(2016, 1, 30), 1).unwrap(), ymd(2016, 3, 1));
    }

    #[test]
    fn test_december_rolls_year() {
        assert_eq!(payment_date(ymd(2015, 12, 15), 1).unwrap(), ymd(2016, 1, 15));
        assert_eq!(payment_date(ymd(2015, 8, 24), 36).unwrap(), ymd(2018, 8, 24));
        // Dec 31 + 2 months -> Feb 31 2016 -> Mar 2 2016
        assert_eq!(payment_date(ymd(2015, 12, 31), 2).unwrap(), ymd(2016, 3, 2));
    }

    #[test]
    fn test_day_kept_unless_month_is_short() {
        let issue = ymd(2015, 8, 31);
        for k in 1..=24 {
            let date = payment_date(issue, k).unwrap();
            let months = 7 + k;
            let target_year = 2015 + (months / 12) as i32;
            let target_month = months % 12 + 1;
            if days_in_month(target_year, target_month).unwrap() == 31 {
                assert_eq!(date.day(), 31, "period {}", k);
            } else {
                assert_ne!(date.day(), 31, "period {}", k);
            }
        }
    }

    #[test]
    fn test_chained_overflow() {
        // 60 Feb 2015 -> 32 Mar -> 1 Apr
        assert_eq!(spreadsheet_date(2015, 2, 60).unwrap(), ymd(2015, 4, 1));
    }

    #[test]
    fn test_invalid_components() {
        assert!(matches!(spreadsheet_date(2015, 13, 1), Err(LoanIrrError::InvalidDate { .. })));
        assert!(matches!(spreadsheet_date(2015, 2, 0), Err(LoanIrrError::InvalidDate { .. })));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2015, 2), Some(28));
        assert_eq!(days_in_month(2016, 2), Some(29));
        assert_eq!(days_in_month(2015, 12), Some(31));
        assert_eq!(days_in_month(2015, 4), Some(30));
    }
}
