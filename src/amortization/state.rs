//! Per-period simulation state

/// Running totals of one simulation pass. Lives only inside the loop.
#[derive(Debug, Clone)]
pub struct PeriodState {
    /// Current period (1-indexed, 0 before the first payment)
    pub period: u32,

    /// Outstanding balance, never increases
    pub balance: f64,

    /// Interest paid so far, never decreases
    pub total_interest: f64,

    /// Scheduled principal paid so far
    pub total_principal: f64,

    /// Extra principal paid so far
    pub total_extra: f64,
}

/// Amounts paid in a single period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodPayment {
    pub interest: f64,
    pub principal: f64,
    pub extra: f64,
    /// Extra that was configured but not applied because the balance ran out
    pub extra_dropped: f64,
}

impl PeriodPayment {
    pub fn total(&self) -> f64 {
        self.interest + self.principal + self.extra
    }
}

impl PeriodState {
    pub fn new(principal: f64) -> Self {
        Self {
            period: 0,
            balance: principal,
            total_interest: 0.0,
            total_principal: 0.0,
            total_extra: 0.0,
        }
    }

    /// Apply one period: accrue interest, pay the scheduled amount, then the extra.
    ///
    /// Principal and extra are capped so the balance never goes negative.
    pub fn advance(&mut self, periodic_rate: f64, payment: f64, extra: f64) -> PeriodPayment {
        self.period += 1;

        let interest = self.balance * periodic_rate;
        let principal = (payment - interest).max(0.0).min(self.balance);
        let remaining = self.balance - principal;
        let applied_extra = extra.min(remaining).max(0.0);

        self.balance = remaining - applied_extra;
        self.total_interest += interest;
        self.total_principal += principal;
        self.total_extra += applied_extra;

        PeriodPayment {
            interest,
            principal,
            extra: applied_extra,
            extra_dropped: extra - applied_extra,
        }
    }

    pub fn is_paid_off(&self, epsilon: f64) -> bool {
        self.balance <= epsilon
    }

    /// Principal repaid so far, scheduled plus extra
    pub fn principal_repaid(&self) -> f64 {
        self.total_principal + self.total_extra
    }

    pub fn total_paid(&self) -> f64 {
        self.total_interest + self.principal_repaid()
    }
}
