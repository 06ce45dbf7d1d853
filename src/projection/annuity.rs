//! Level-payment annuity math (PMT / IPMT / PPMT)
//!
//! Sign convention follows the spreadsheet functions: a negative present
//! value (money lent out) produces positive payments.

/// Fixed payment per period
pub fn payment(rate: f64, periods: u32, present_value: f64) -> f64 {
    if rate == 0.0 {
        return -present_value / periods as f64;
    }
    let pvif = (1.0 + rate).powi(periods as i32);
    rate / (pvif - 1.0) * -(present_value * pvif)
}

/// Interest and principal portions for one (rate, periods, present value)
///
/// Interest for period `p` depends on principal repaid in periods `1..p`,
/// so portions are memoized in period order. The memo belongs to this
/// value: build a new `Annuity` whenever any parameter changes.
#[derive(Debug, Clone)]
pub struct Annuity {
    rate: f64,
    periods: u32,
    present_value: f64,
    payment: f64,
    /// interest[p] for p = 0..len
    interest: Vec<f64>,
    /// cumulative[p] = principal repaid in periods 1..p-1
    cumulative: Vec<f64>,
}

impl Annuity {
    pub fn new(rate: f64, periods: u32, present_value: f64) -> Self {
        Self {
            rate,
            periods,
            present_value,
            payment: payment(rate, periods, present_value),
            interest: vec![0.0],
            cumulative: vec![0.0],
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    pub fn present_value(&self) -> f64 {
        self.present_value
    }

    /// Fixed payment per period
    pub fn payment(&self) -> f64 {
        self.payment
    }

    /// Interest portion of payment `period` (0 for period 0)
    pub fn interest_portion(&mut self, period: u32) -> f64 {
        self.extend_to(period as usize);
        self.interest[period as usize]
    }

    /// Principal portion of payment `period` (0 for period 0)
    pub fn principal_portion(&mut self, period: u32) -> f64 {
        if period == 0 {
            return 0.0;
        }
        self.payment - self.interest_portion(period)
    }

    /// Principal repaid by payments `1..period` (exclusive of `period`)
    pub fn cumulative_principal_paid(&mut self, period: u32) -> f64 {
        self.extend_to(period as usize);
        self.cumulative[period as usize]
    }

    fn extend_to(&mut self, period: usize) {
        while self.interest.len() <= period {
            let next = self.interest.len();
            let prior = next - 1;
            let prior_principal = if prior == 0 {
                0.0
            } else {
                self.payment - self.interest[prior]
            };
            let cumulative = self.cumulative[prior] + prior_principal;
            let interest = -(self.present_value + cumulative) * self.rate;

            self.cumulative.push(cumulative);
            self.interest.push(interest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_payment_matches_spreadsheet() {
        // =PMT(0.01, 12, -1000) = 88.84878867...
        assert_abs_diff_eq!(payment(0.01, 12, -1000.0), 88.848788677, epsilon = 1e-8);
        // Positive PV gives a negative payment
        assert_abs_diff_eq!(payment(0.01, 12, 1000.0), -88.848788677, epsilon = 1e-8);
    }

    #[test]
    fn test_zero_rate_payment() {
        assert_abs_diff_eq!(payment(0.0, 36, -7200.0), 200.0, epsilon = 1e-12);
        let mut annuity = Annuity::new(0.0, 36, -7200.0);
        assert_eq!(annuity.interest_portion(5), 0.0);
        assert_abs_diff_eq!(annuity.principal_portion(5), 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_period_zero_is_empty() {
        let mut annuity = Annuity::new(0.02, 36, -7500.0);
        assert_eq!(annuity.interest_portion(0), 0.0);
        assert_eq!(annuity.principal_portion(0), 0.0);
        assert_eq!(annuity.cumulative_principal_paid(0), 0.0);
        assert_eq!(annuity.cumulative_principal_paid(1), 0.0);
    }

    #[test]
    fn test_first_period_split() {
        let mut annuity = Annuity::new(0.01, 12, -1000.0);
        // First interest is the full balance times rate
        assert_abs_diff_eq!(annuity.interest_portion(1), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            annuity.principal_portion(1),
            annuity.payment() - 10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_principal_sums_to_present_value() {
        for &(rate, periods, pv) in &[
            (0.280007632124385 / 12.0, 36u32, -7500.0),
            (0.12 / 12.0, 60, 25_000.0),
            (0.0, 24, -1200.0),
        ] {
            let mut annuity = Annuity::new(rate, periods, pv);
            let total: f64 = (1..=periods).map(|p| annuity.principal_portion(p)).sum();
            assert_abs_diff_eq!(total, -pv, epsilon = 1e-6);
            assert_abs_diff_eq!(annuity.cumulative_principal_paid(periods + 1), -pv, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_out_of_order_lookups_match_sequential() {
        let mut forward = Annuity::new(0.015, 48, -10_000.0);
        let sequential: Vec<f64> = (0..=48).map(|p| forward.interest_portion(p)).collect();

        let mut backward = Annuity::new(0.015, 48, -10_000.0);
        for p in (0..=48).rev() {
            assert_eq!(backward.interest_portion(p), sequential[p as usize]);
        }
    }

    #[test]
    fn test_separate_instances_do_not_share_memo() {
        let mut a = Annuity::new(0.01, 12, -1000.0);
        let mut b = Annuity::new(0.02, 12, -1000.0);
        let a5 = a.interest_portion(5);
        let b5 = b.interest_portion(5);
        assert!((a5 - b5).abs() > 1e-6);
        assert_eq!(a.interest_portion(5), a5);
    }
}
