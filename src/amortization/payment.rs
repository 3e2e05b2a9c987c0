//! Fixed periodic payment calculation

use crate::loan::{LoanInputs, PaymentFrequency};

/// Level payment that retires `principal` over `periods` at `periodic_rate`.
///
/// `payment = P * r / (1 - (1+r)^-n)`, evaluated through `ln_1p`/`exp_m1` so
/// tiny rates keep their precision. Falls back to `P / n` when the rate is zero
/// or too small to register.
pub fn annuity_payment(principal: f64, periodic_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return principal;
    }
    let n = periods as f64;
    if periodic_rate == 0.0 {
        return principal / n;
    }
    let discount = -(-n * periodic_rate.ln_1p()).exp_m1();
    if !(discount.is_finite() && discount > 0.0) {
        return principal / n;
    }
    principal * periodic_rate / discount
}

/// Standard monthly annuity payment for the loan's principal, rate and term
pub fn monthly_payment(loan: &LoanInputs) -> f64 {
    annuity_payment(loan.principal, loan.annual_rate() / 12.0, loan.term_years * 12)
}

/// Scheduled payment per period for the loan's frequency.
///
/// Accelerated bi-weekly pins the payment to half the monthly annuity payment;
/// every other frequency uses the annuity over `term_years * periods_per_year`.
pub fn scheduled_payment(loan: &LoanInputs) -> f64 {
    match loan.frequency {
        PaymentFrequency::AcceleratedBiweekly => monthly_payment(loan) / 2.0,
        _ => annuity_payment(loan.principal, loan.periodic_rate(), loan.nominal_periods()),
    }
}
