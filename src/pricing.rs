//! One-call pricing entry point

use crate::assumptions::AssumptionProvider;
use crate::error::LoanIrrResult;
use crate::loan::LoanParameters;
use crate::projection::{LoanValuation, ProjectionConfig, ProjectionEngine};

/// Project a loan under the default configuration and solve for its IRR
pub fn price_loan<P: AssumptionProvider>(
    loan: &LoanParameters,
    assumptions: P,
) -> LoanIrrResult<LoanValuation> {
    price_loan_with_config(loan, assumptions, ProjectionConfig::default())
}

/// Project a loan under an explicit configuration and solve for its IRR
pub fn price_loan_with_config<P: AssumptionProvider>(
    loan: &LoanParameters,
    assumptions: P,
    config: ProjectionConfig,
) -> LoanIrrResult<LoanValuation> {
    ProjectionEngine::new(assumptions, config).value_loan(loan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionTables;
    use crate::error::LoanIrrError;
    use crate::loan::reference_loan;

    #[test]
    fn test_price_reference_loan_with_bundled_tables() {
        let tables = AssumptionTables::from_csv().expect("Failed to load assumptions");
        let valuation = price_loan(&reference_loan(), &tables).unwrap();

        assert!(valuation.converged());
        assert_eq!(valuation.records().len(), 37);
        assert!(valuation.annualized_irr_pct.is_finite());
        // Every month after purchase pays the investor
        for record in &valuation.records()[1..] {
            assert!(record.total_cf > 0.0, "month {}", record.month);
        }

        // Maturity clears the balance except the final month's prepayment on
        // scheduled interest, which is left as a small negative residual
        let last = valuation.records().last().unwrap();
        assert!(last.balance <= 0.0 && last.balance > -1.0, "final balance {}", last.balance);
        for record in &valuation.records()[..36] {
            assert!(record.balance > 0.0, "month {}", record.month);
        }
    }

    #[test]
    fn test_higher_premium_lowers_irr() {
        let tables = AssumptionTables::from_csv().unwrap();
        let loan = reference_loan();
        let rich = crate::loan::LoanParameters {
            purchase_premium: loan.purchase_premium + 0.05,
            ..loan.clone()
        };

        let base = price_loan(&loan, &tables).unwrap();
        let expensive = price_loan(&rich, &tables).unwrap();
        assert!(expensive.annualized_irr_pct < base.annualized_irr_pct);
    }

    #[test]
    fn test_missing_grade_surfaces_to_caller() {
        let tables = AssumptionTables::from_csv().unwrap();
        let loan = crate::loan::LoanParameters {
            grade: "G9".to_string(),
            ..reference_loan()
        };
        assert!(matches!(
            price_loan(&loan, &tables),
            Err(LoanIrrError::MissingAssumption { .. })
        ));
    }
}
