//! Core projection engine: monthly cash-flow waterfall for one loan

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::annuity::Annuity;
use super::cashflows::{PeriodRecord, ProjectionResult, ScheduledPeriod};
use super::dates::payment_date;
use super::irr::{solve_irr, IrrConfig, IrrSolution};
use super::state::WaterfallState;
use super::PERIODS_PER_YEAR;
use crate::assumptions::AssumptionProvider;
use crate::error::{AssumptionKind, LoanIrrError, LoanIrrResult};
use crate::loan::LoanParameters;

/// Configuration for a projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Period labels (1 = time zero) at which an earnout installment is paid.
    /// The earnout fee is split evenly across these.
    pub earnout_months: Vec<u32>,

    /// IRR solver settings
    pub irr: IrrConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            earnout_months: vec![13, 19],
            irr: IrrConfig::default(),
        }
    }
}

/// Projected schedule together with its IRR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanValuation {
    pub projection: ProjectionResult,
    pub irr: IrrSolution,
    /// Nominal annual IRR in percent (monthly rate x 12 x 100)
    pub annualized_irr_pct: f64,
}

impl LoanValuation {
    pub fn records(&self) -> &[PeriodRecord] {
        &self.projection.records
    }

    pub fn converged(&self) -> bool {
        self.irr.converged
    }
}

/// Main projection engine
pub struct ProjectionEngine<P> {
    assumptions: P,
    config: ProjectionConfig,
}

impl<P: AssumptionProvider> ProjectionEngine<P> {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: P, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project the loan and solve for its IRR
    pub fn value_loan(&self, loan: &LoanParameters) -> LoanIrrResult<LoanValuation> {
        let projection = self.project_loan(loan)?;
        let irr = solve_irr(&projection.cashflows(), &self.config.irr)?;
        let annualized_irr_pct = irr.annualized_pct(PERIODS_PER_YEAR);

        info!(
            "Loan {} issued {}: IRR {:.6}% ({} iterations{})",
            loan.product_key(),
            loan.issue_date,
            annualized_irr_pct,
            irr.iterations,
            if irr.converged { "" } else { ", not converged" },
        );

        Ok(LoanValuation {
            projection,
            irr,
            annualized_irr_pct,
        })
    }

    /// Run the waterfall for a single loan
    ///
    /// Produces `term + 1` records: the time-zero purchase followed by one
    /// record per scheduled payment.
    pub fn project_loan(&self, loan: &LoanParameters) -> LoanIrrResult<ProjectionResult> {
        loan.validate()?;

        let schedule = self.scheduled_series(loan)?;
        let mut result = ProjectionResult::with_capacity(schedule.len());

        let mut periods = schedule.iter();
        let opening = match periods.next() {
            Some(first) => self.opening_record(loan, first),
            None => return Ok(result),
        };
        let mut state = WaterfallState::from_opening(&opening);
        result.add_record(opening);

        for scheduled in periods {
            let record = self.roll_period(loan, &state, scheduled);
            debug!(
                "Month {:>3} {}: default={:.4} prepay={:.4} principal={:.4} balance={:.4} total_cf={:.4}",
                record.month,
                record.payment_date,
                record.default_amount,
                record.prepay_amount,
                record.principal_paid,
                record.balance,
                record.total_cf,
            );
            state.advance(&record);
            result.add_record(record);
        }

        Ok(result)
    }

    /// Per-period values that do not depend on the realized balance
    ///
    /// Scheduled amounts always follow the original contract on the
    /// invested amount. A single `Annuity` is built per call so memoized
    /// portions never leak between loans.
    pub fn scheduled_series(&self, loan: &LoanParameters) -> LoanIrrResult<Vec<ScheduledPeriod>> {
        let rate = loan.coupon_rate / PERIODS_PER_YEAR as f64;
        let mut annuity = Annuity::new(rate, loan.term, -loan.invested);

        debug!(
            "Scheduling {} months at {:.8} per month, payment {:.4}",
            loan.term,
            rate,
            annuity.payment()
        );

        let mut series = Vec::with_capacity(loan.term as usize + 1);
        for payment_count in 0..=loan.term {
            let month = payment_count + 1;

            series.push(ScheduledPeriod {
                month,
                payment_count,
                payment_date: payment_date(loan.issue_date, payment_count)?,
                scheduled_principal: annuity.principal_portion(payment_count),
                scheduled_interest: annuity.interest_portion(payment_count),
                scheduled_balance: loan.invested - annuity.cumulative_principal_paid(month),
                prepay_rate: self.prepay_rate(loan, month)?,
                default_rate: self.default_rate(loan, month)?,
                earnout_cf: self.earnout(loan, month),
            });
        }

        Ok(series)
    }

    /// Time-zero record: the purchase outlay against the full invested balance
    fn opening_record(&self, loan: &LoanParameters, scheduled: &ScheduledPeriod) -> PeriodRecord {
        let mut record = PeriodRecord::from_scheduled(scheduled);
        record.balance = loan.invested;
        record.total_cf = -loan.invested * (1.0 + loan.purchase_premium);
        record
    }

    /// Roll the balance forward one month from the prior period's state
    fn roll_period(
        &self,
        loan: &LoanParameters,
        state: &WaterfallState,
        scheduled: &ScheduledPeriod,
    ) -> PeriodRecord {
        let mut row = PeriodRecord::from_scheduled(scheduled);
        let prior_balance = state.prior_balance;

        // Default uses last period's looked-up rate
        row.default_amount = prior_balance * state.prior_default_rate * loan.default_multiplier;

        row.prepay_amount = (prior_balance
            - ((prior_balance - row.scheduled_interest) / state.prior_scheduled_balance)
                * row.scheduled_principal)
            * row.prepay_rate
            * loan.prepay_multiplier;

        // Scheduled principal re-scaled from the contractual to the performing balance
        let performing = prior_balance - row.default_amount;
        row.principal_paid =
            performing / state.prior_scheduled_balance * row.scheduled_principal + row.prepay_amount;

        row.balance = prior_balance - row.default_amount - row.principal_paid;
        row.recovery = row.default_amount * loan.recovery_rate;
        row.servicing_cf = performing * loan.servicing_fee / PERIODS_PER_YEAR as f64;
        row.interest_cf = performing * loan.coupon_rate / PERIODS_PER_YEAR as f64;

        row.total_cf =
            row.principal_paid + row.interest_cf + row.recovery - row.servicing_cf - row.earnout_cf;

        row
    }

    fn prepay_rate(&self, loan: &LoanParameters, month: u32) -> LoanIrrResult<f64> {
        // No prepayment in the first month
        if month == 1 {
            return Ok(0.0);
        }
        self.assumptions
            .prepay_rate(loan.term, month)
            .ok_or_else(|| LoanIrrError::MissingAssumption {
                table: AssumptionKind::Prepay,
                column: loan.term.to_string(),
                month,
            })
    }

    fn default_rate(&self, loan: &LoanParameters, month: u32) -> LoanIrrResult<f64> {
        self.assumptions
            .default_rate(loan.term, &loan.grade, month)
            .ok_or_else(|| LoanIrrError::MissingAssumption {
                table: AssumptionKind::ChargedOff,
                column: loan.product_key(),
                month,
            })
    }

    /// Earnout installment paid at `month`; never at time zero
    fn earnout(&self, loan: &LoanParameters, month: u32) -> f64 {
        let milestones = &self.config.earnout_months;
        if month > 1 && milestones.contains(&month) {
            loan.earnout_fee / milestones.len() as f64 * loan.invested
        } else {
            0.0
        }
    }
}
