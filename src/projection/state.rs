//! Waterfall state carried from one period to the next

use super::cashflows::PeriodRecord;

/// Prior-period values the next period's waterfall reads
#[derive(Debug, Clone)]
pub struct WaterfallState {
    /// Label of the last period rolled
    pub month: u32,

    /// Prior period's realized ending balance
    pub prior_balance: f64,

    /// Prior period's contractual balance (normalizes scheduled principal)
    pub prior_scheduled_balance: f64,

    /// Prior period's default-rate input; default is applied with a one-period lag
    pub prior_default_rate: f64,
}

impl WaterfallState {
    /// State after the time-zero record
    pub fn from_opening(record: &PeriodRecord) -> Self {
        Self {
            month: record.month,
            prior_balance: record.balance,
            prior_scheduled_balance: record.scheduled_balance,
            prior_default_rate: record.default_rate,
        }
    }

    /// Advance past a completed record
    pub fn advance(&mut self, record: &PeriodRecord) {
        self.month = record.month;
        self.prior_balance = record.balance;
        self.prior_scheduled_balance = record.scheduled_balance;
        self.prior_default_rate = record.default_rate;
    }
}
