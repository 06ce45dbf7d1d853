//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson on the periodic NPV of the net cashflow series.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{LoanIrrError, LoanIrrResult};

/// Solver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrConfig {
    /// Starting periodic rate
    pub guess: f64,
    /// Iteration cap
    pub max_iterations: u32,
    /// Stop once |NPV| falls below this
    pub tolerance: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            guess: 0.1,
            max_iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

/// Periodic IRR with its convergence status
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Rate per period (monthly for loan schedules)
    pub periodic_rate: f64,
    /// Newton steps taken
    pub iterations: u32,
    /// False when the iteration cap was hit first; the rate is then best-effort
    pub converged: bool,
    /// NPV at the last evaluated rate
    pub npv: f64,
}

impl IrrSolution {
    /// Nominal annual rate (periodic rate times periods per year)
    pub fn annualized(&self, periods_per_year: u32) -> f64 {
        self.periodic_rate * periods_per_year as f64
    }

    /// Nominal annual rate as a percentage
    pub fn annualized_pct(&self, periods_per_year: u32) -> f64 {
        self.annualized(periods_per_year) * 100.0
    }
}

/// Solve for the periodic rate at which the NPV of `cashflows` is zero
///
/// Cashflow `t` is discounted by `(1 + r)^t`. Reaching the iteration cap
/// returns the last rate with `converged = false`; a vanishing or
/// non-finite derivative is an error.
pub fn solve_irr(cashflows: &[f64], config: &IrrConfig) -> LoanIrrResult<IrrSolution> {
    if cashflows.len() < 2 {
        return Err(LoanIrrError::invalid_input(
            "cashflows",
            "IRR requires at least 2 cash flows",
        ));
    }

    let mut rate = config.guess;

    for iteration in 1..=config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv == 0.0 || !dnpv.is_finite() || !npv.is_finite() {
            return Err(LoanIrrError::NonConvergent {
                iterations: iteration,
                rate,
            });
        }

        rate -= npv / dnpv;

        if npv.abs() < config.tolerance {
            return Ok(IrrSolution {
                periodic_rate: rate,
                iterations: iteration,
                converged: true,
                npv,
            });
        }
    }

    let npv = npv_at_rate(cashflows, rate);
    warn!(
        "IRR did not reach tolerance {:e} within {} iterations; returning best-effort rate {} (NPV {:e})",
        config.tolerance, config.max_iterations, rate, npv
    );

    Ok(IrrSolution {
        periodic_rate: rate,
        iterations: config.max_iterations,
        converged: false,
        npv,
    })
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
    }

    (npv, dnpv)
}

/// Calculate NPV at a given periodic rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_period_round_trip() {
        let solution = solve_irr(&[-100.0, 110.0], &IrrConfig::default()).unwrap();
        assert!(solution.converged);
        assert_abs_diff_eq!(solution.periodic_rate, 0.10, epsilon = 1e-9);
        assert_abs_diff_eq!(110.0 / (1.0 + solution.periodic_rate), 100.0, epsilon = 1e-7);
    }

    #[test]
    fn test_simple_irr() {
        // Investment of $1000, returns $1100 after 12 months
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let solution = solve_irr(&cashflows, &IrrConfig::default()).unwrap();
        let expected = 1.1_f64.powf(1.0 / 12.0) - 1.0;
        assert!(solution.converged);
        assert_abs_diff_eq!(solution.periodic_rate, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_level_payments_recover_coupon() {
        // Lend 1000, receive 12 level payments at 1% per month
        let pmt = crate::projection::annuity::payment(0.01, 12, -1000.0);
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![pmt; 12]);

        let solution = solve_irr(&cashflows, &IrrConfig::default()).unwrap();
        assert_abs_diff_eq!(solution.periodic_rate, 0.01, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.annualized_pct(12), 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_derivative_is_non_convergent() {
        // Only a time-zero flow: NPV' is identically zero
        match solve_irr(&[5.0, 0.0], &IrrConfig::default()) {
            Err(LoanIrrError::NonConvergent { iterations, .. }) => assert_eq!(iterations, 1),
            other => panic!("expected NonConvergent, got {:?}", other),
        }
    }

    #[test]
    fn test_iteration_cap_returns_best_effort() {
        let config = IrrConfig {
            guess: 0.5,
            max_iterations: 1,
            tolerance: 1e-10,
        };
        let solution = solve_irr(&[-100.0, 110.0], &config).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 1);
        assert!(solution.periodic_rate.is_finite());
        assert_abs_diff_eq!(solution.npv, npv_at_rate(&[-100.0, 110.0], solution.periodic_rate), epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_cashflows() {
        assert!(solve_irr(&[-100.0], &IrrConfig::default()).is_err());
    }

    #[test]
    fn test_nominal_annualization() {
        let solution = IrrSolution {
            periodic_rate: 0.004575,
            iterations: 3,
            converged: true,
            npv: 0.0,
        };
        assert_abs_diff_eq!(solution.annualized(12), 0.0549, epsilon = 1e-12);
        assert_abs_diff_eq!(solution.annualized_pct(12), 5.49, epsilon = 1e-10);
    }
}
