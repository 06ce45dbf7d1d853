//! Cashflow output structures for loan projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of the projected schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    // Timing
    /// 1-based period label (1 = time zero)
    pub month: u32,
    /// Payments made so far (0 at time zero)
    pub payment_count: u32,
    pub payment_date: NaiveDate,

    // Contractual schedule, independent of default and prepayment
    pub scheduled_principal: f64,
    pub scheduled_interest: f64,
    pub scheduled_balance: f64,

    // Assumption inputs
    pub prepay_rate: f64,
    pub default_rate: f64,

    // Realized balance roll
    pub default_amount: f64,
    pub prepay_amount: f64,
    pub principal_paid: f64,
    pub balance: f64,

    // Cashflows
    pub recovery: f64,
    pub servicing_cf: f64,
    pub earnout_cf: f64,
    pub interest_cf: f64,
    pub total_cf: f64,
}

/// Scalar series for one period, computed before the balance roll
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPeriod {
    pub month: u32,
    pub payment_count: u32,
    pub payment_date: NaiveDate,
    pub scheduled_principal: f64,
    pub scheduled_interest: f64,
    pub scheduled_balance: f64,
    pub prepay_rate: f64,
    pub default_rate: f64,
    pub earnout_cf: f64,
}

impl PeriodRecord {
    /// Record carrying the scheduled series with every realized field zeroed
    pub fn from_scheduled(scheduled: &ScheduledPeriod) -> Self {
        Self {
            month: scheduled.month,
            payment_count: scheduled.payment_count,
            payment_date: scheduled.payment_date,
            scheduled_principal: scheduled.scheduled_principal,
            scheduled_interest: scheduled.scheduled_interest,
            scheduled_balance: scheduled.scheduled_balance,
            prepay_rate: scheduled.prepay_rate,
            default_rate: scheduled.default_rate,
            default_amount: 0.0,
            prepay_amount: 0.0,
            principal_paid: 0.0,
            balance: 0.0,
            recovery: 0.0,
            servicing_cf: 0.0,
            earnout_cf: scheduled.earnout_cf,
            interest_cf: 0.0,
            total_cf: 0.0,
        }
    }
}

/// Complete projection of one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One record per period, time zero first
    pub records: Vec<PeriodRecord>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn with_capacity(periods: usize) -> Self {
        Self {
            records: Vec::with_capacity(periods),
        }
    }

    /// Add a period record
    pub fn add_record(&mut self, record: PeriodRecord) {
        self.records.push(record);
    }

    /// Net cashflow series, index 0 = purchase outlay
    pub fn cashflows(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.total_cf).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_principal: f64 = self.records.iter().map(|r| r.principal_paid).sum();
        let total_interest: f64 = self.records.iter().map(|r| r.interest_cf).sum();
        let total_default: f64 = self.records.iter().map(|r| r.default_amount).sum();
        let total_prepay: f64 = self.records.iter().map(|r| r.prepay_amount).sum();
        let total_recovery: f64 = self.records.iter().map(|r| r.recovery).sum();
        let total_servicing: f64 = self.records.iter().map(|r| r.servicing_cf).sum();
        let total_earnout: f64 = self.records.iter().map(|r| r.earnout_cf).sum();
        let total_net_cf: f64 = self.records.iter().map(|r| r.total_cf).sum();

        let final_balance = self.records.last().map(|r| r.balance).unwrap_or(0.0);

        ProjectionSummary {
            total_periods: self.records.len() as u32,
            total_principal,
            total_interest,
            total_default,
            total_prepay,
            total_recovery,
            total_servicing,
            total_earnout,
            total_net_cf,
            final_balance,
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_periods: u32,
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_default: f64,
    pub total_prepay: f64,
    pub total_recovery: f64,
    pub total_servicing: f64,
    pub total_earnout: f64,
    pub total_net_cf: f64,
    pub final_balance: f64,
}
