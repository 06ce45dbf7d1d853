//! Loan parameters for a single purchased consumer loan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LoanIrrError, LoanIrrResult};

fn default_multiplier() -> f64 {
    1.0
}

/// Immutable inputs describing one loan and the terms it was purchased on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Origination date; payment dates are counted in months from here
    pub issue_date: NaiveDate,

    /// Contractual term in months
    pub term: u32,

    /// Credit grade code (e.g. "C4"), selects the charged-off curve
    pub grade: String,

    /// Annual coupon rate
    pub coupon_rate: f64,

    /// Amount invested at purchase (original principal)
    pub invested: f64,

    /// Outstanding balance as reported by the originator (informational)
    pub outstanding_balance: f64,

    /// Fraction of each default recovered in the same period
    pub recovery_rate: f64,

    /// Premium paid over par at purchase
    pub purchase_premium: f64,

    /// Annual servicing fee rate, charged monthly on performing balance
    pub servicing_fee: f64,

    /// Total earnout fee rate, paid across the earnout milestones
    pub earnout_fee: f64,

    /// Scales the charged-off curve
    #[serde(default = "default_multiplier")]
    pub default_multiplier: f64,

    /// Scales the prepayment curve
    #[serde(default = "default_multiplier")]
    pub prepay_multiplier: f64,
}

impl LoanParameters {
    /// Monthly (periodic) coupon rate
    pub fn monthly_coupon(&self) -> f64 {
        self.coupon_rate / 12.0
    }

    /// Purchase price paid at time zero
    pub fn purchase_price(&self) -> f64 {
        self.invested * (1.0 + self.purchase_premium)
    }

    /// Column key into the charged-off table, e.g. "36-C4"
    pub fn product_key(&self) -> String {
        format!("{}-{}", self.term, self.grade)
    }

    /// Same loan with the assumption multipliers replaced
    pub fn with_multipliers(&self, default_multiplier: f64, prepay_multiplier: f64) -> Self {
        Self {
            default_multiplier,
            prepay_multiplier,
            ..self.clone()
        }
    }

    /// Reject inputs the waterfall cannot project
    pub fn validate(&self) -> LoanIrrResult<()> {
        if self.term == 0 {
            return Err(LoanIrrError::invalid_input("term", "must be at least 1 month"));
        }
        if self.grade.trim().is_empty() {
            return Err(LoanIrrError::invalid_input("grade", "must not be empty"));
        }
        if !(self.invested.is_finite() && self.invested > 0.0) {
            return Err(LoanIrrError::invalid_input("invested", "must be a positive amount"));
        }

        let finite_fields = [
            ("coupon_rate", self.coupon_rate),
            ("outstanding_balance", self.outstanding_balance),
            ("recovery_rate", self.recovery_rate),
            ("purchase_premium", self.purchase_premium),
            ("servicing_fee", self.servicing_fee),
            ("earnout_fee", self.earnout_fee),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(LoanIrrError::invalid_input(field, "must be a finite number"));
            }
        }

        for (field, value) in [
            ("default_multiplier", self.default_multiplier),
            ("prepay_multiplier", self.prepay_multiplier),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LoanIrrError::invalid_input(field, "must be a non-negative number"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn reference_loan() -> LoanParameters {
    LoanParameters {
        issue_date: NaiveDate::from_ymd_opt(2015, 8, 24).unwrap(),
        term: 36,
        grade: "C4".to_string(),
        coupon_rate: 0.280007632124385,
        invested: 7500.00,
        outstanding_balance: 3228.61,
        recovery_rate: 0.08,
        purchase_premium: 0.051422082,
        servicing_fee: 0.025,
        earnout_fee: 0.025,
        default_multiplier: 1.0,
        prepay_multiplier: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let loan = reference_loan();
        assert_eq!(loan.product_key(), "36-C4");
        assert!((loan.monthly_coupon() - 0.280007632124385 / 12.0).abs() < 1e-15);
        assert!((loan.purchase_price() - 7885.6656150).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_zero_term() {
        let loan = LoanParameters { term: 0, ..reference_loan() };
        match loan.validate() {
            Err(LoanIrrError::InvalidInput { field, .. }) => assert_eq!(field, "term"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_multiplier() {
        let loan = reference_loan().with_multipliers(-1.0, 1.0);
        assert!(loan.validate().is_err());
        assert!(reference_loan().validate().is_ok());
    }

    #[test]
    fn test_multipliers_default_when_absent() {
        let json = r#"{
            "issue_date": "2015-08-24", "term": 36, "grade": "C4",
            "coupon_rate": 0.28, "invested": 7500.0, "outstanding_balance": 3228.61,
            "recovery_rate": 0.08, "purchase_premium": 0.05,
            "servicing_fee": 0.025, "earnout_fee": 0.025
        }"#;
        let loan: LoanParameters = serde_json::from_str(json).unwrap();
        assert_eq!(loan.default_multiplier, 1.0);
        assert_eq!(loan.prepay_multiplier, 1.0);
    }
}
