//! Core amortization engine: period-by-period payoff simulation

use log::{debug, warn};

use super::payment::scheduled_payment;
use super::result::{BiweeklyComparison, LoanMetrics, LoanResult};
use super::schedule::{YearlySummary, YearlyAccumulator};
use super::state::PeriodState;
use crate::config::EngineConfig;
use crate::format::{summary_sentence, ChartSeries, FormattedMetrics};
use crate::loan::{ExtraPayments, LoanInputs, PaymentFrequency};

/// Fixed parameters of one simulation pass
#[derive(Debug, Clone, Copy)]
struct PaymentPlan {
    frequency: PaymentFrequency,
    periodic_rate: f64,
    payment: f64,
    /// Safety cap: never simulate more periods than this
    max_periods: u32,
}

/// What one pass produced
#[derive(Debug, Clone)]
struct SimulationOutcome {
    periods: u32,
    total_interest: f64,
    total_paid: f64,
    principal_repaid: f64,
    final_balance: f64,
    paid_off: bool,
    hit_cap: bool,
    yearly: Vec<YearlySummary>,
    /// Period the one-time extra was due, if the simulation got that far
    one_time_reached: bool,
    /// Extra that the balance cap swallowed in the one-time period
    one_time_dropped: f64,
}

/// Main amortization engine. Stateless between calls.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute payment, payoff schedule and savings metrics for a loan.
    ///
    /// Never fails: inputs that do not validate produce `LoanResult::invalid`.
    pub fn calculate(&self, loan: &LoanInputs) -> LoanResult {
        if let Err(err) = loan.validate() {
            debug!("Rejected loan inputs: {}", err);
            return LoanResult::invalid(err.to_string());
        }

        let payment = scheduled_payment(loan);
        if !(payment.is_finite() && payment > 0.0) {
            warn!("Scheduled payment is not computable: {}", payment);
            return LoanResult::invalid(format!(
                "payment is not computable for these terms ({})",
                payment
            ));
        }

        let plan = PaymentPlan {
            frequency: loan.frequency,
            periodic_rate: loan.periodic_rate(),
            payment,
            max_periods: self.config.max_periods(loan.nominal_periods()),
        };

        let baseline = self.simulate(loan.principal, &plan, None, None);
        let extras = loan.active_extras();
        let actual = match extras {
            Some(extras) => self.simulate(loan.principal, &plan, Some(extras), None),
            None => baseline.clone(),
        };

        let midpoint_period = actual.periods / 2;
        let midpoint = self.simulate(loan.principal, &plan, extras, Some(midpoint_period));

        let biweekly_comparison = if self.config.biweekly_comparison
            && loan.frequency == PaymentFrequency::Monthly
        {
            Some(self.compare_biweekly(loan, &plan, &baseline))
        } else {
            None
        };

        let warnings = self.collect_warnings(loan, &baseline, &actual);

        let ppy = plan.frequency.periods_per_year() as f64;
        let metrics = LoanMetrics {
            principal: loan.principal,
            frequency: loan.frequency,
            periods_per_year: loan.periods_per_year(),
            payment: plan.payment,
            actual_periods: actual.periods,
            total_interest: actual.total_interest,
            total_paid: actual.total_paid,
            payoff_date: loan.frequency.advance_date(loan.start_date, actual.periods),
            baseline_periods: baseline.periods,
            baseline_total_interest: baseline.total_interest,
            baseline_payoff_date: loan.frequency.advance_date(loan.start_date, baseline.periods),
            interest_saved: baseline.total_interest - actual.total_interest,
            time_saved_months: (baseline.periods as f64 - actual.periods as f64) * 12.0 / ppy,
            equity_at_midpoint: midpoint.principal_repaid,
            midpoint_period,
            daily_interest_cost: loan.principal * loan.annual_rate() / 365.0,
            interest_to_principal_ratio: actual.total_interest / loan.principal,
            biweekly_comparison,
            hit_safety_cap: actual.hit_cap,
        };

        let formatted = FormattedMetrics::from_metrics(&metrics, &self.config.currency);
        let summary = summary_sentence(&metrics, &formatted);
        let chart = ChartSeries::from_schedule(&actual.yearly);

        LoanResult {
            is_valid: true,
            invalid_reason: None,
            metrics: Some(metrics),
            formatted,
            summary,
            yearly_schedule: actual.yearly,
            chart,
            warnings,
        }
    }

    /// Run one pass from period 1 until payoff, the safety cap, or `stop_after`
    fn simulate(
        &self,
        principal: f64,
        plan: &PaymentPlan,
        extras: Option<&ExtraPayments>,
        stop_after: Option<u32>,
    ) -> SimulationOutcome {
        let mut state = PeriodState::new(principal);
        let mut yearly = YearlyAccumulator::new(plan.frequency.periods_per_year());

        let one_time_period = extras
            .filter(|e| e.extra_one_time > 0.0)
            .and_then(|e| e.one_time_period_index)
            .and_then(|month| plan.frequency.period_for_month(month));
        let mut one_time_reached = false;
        let mut one_time_dropped = 0.0;

        let limit = stop_after.map_or(plan.max_periods, |n| n.min(plan.max_periods));
        let mut paid_off = state.is_paid_off(self.config.payoff_epsilon);

        while !paid_off && state.period < limit {
            let period = state.period + 1;
            let extra = extras.map_or(0.0, |e| e.amount_for_period(period, plan.frequency));

            let paid = state.advance(plan.periodic_rate, plan.payment, extra);
            yearly.record(&state, &paid);

            if Some(period) == one_time_period {
                one_time_reached = true;
                one_time_dropped = paid.extra_dropped;
            }

            paid_off = state.is_paid_off(self.config.payoff_epsilon);
        }

        let hit_cap = !paid_off && stop_after.is_none() && state.period >= plan.max_periods;
        if hit_cap {
            warn!(
                "Simulation stopped at safety cap of {} periods with {:.2} outstanding",
                plan.max_periods, state.balance
            );
        }

        debug!(
            "Simulated {} {} periods: interest {:.2}, balance {:.2}{}",
            state.period,
            plan.frequency,
            state.total_interest,
            state.balance,
            if extras.is_some() { " (with extras)" } else { "" }
        );

        SimulationOutcome {
            periods: state.period,
            total_interest: state.total_interest,
            total_paid: state.total_paid(),
            principal_repaid: state.principal_repaid(),
            final_balance: state.balance,
            paid_off,
            hit_cap,
            yearly: yearly.finish(),
            one_time_reached,
            one_time_dropped,
        }
    }

    /// Half the monthly payment every two weeks, no extras
    fn compare_biweekly(
        &self,
        loan: &LoanInputs,
        monthly: &PaymentPlan,
        baseline: &SimulationOutcome,
    ) -> BiweeklyComparison {
        let frequency = PaymentFrequency::Biweekly;
        let ppy = frequency.periods_per_year();
        let plan = PaymentPlan {
            frequency,
            periodic_rate: loan.annual_rate() / ppy as f64,
            payment: monthly.payment / 2.0,
            max_periods: self.config.max_periods(loan.term_years.saturating_mul(ppy)),
        };
        let outcome = self.simulate(loan.principal, &plan, None, None);

        BiweeklyComparison {
            payment: plan.payment,
            periods: outcome.periods,
            total_interest: outcome.total_interest,
            interest_saved: baseline.total_interest - outcome.total_interest,
            months_saved: baseline.periods as f64 - outcome.periods as f64 * 12.0 / ppy as f64,
            payoff_date: frequency.advance_date(loan.start_date, outcome.periods),
        }
    }

    fn collect_warnings(
        &self,
        loan: &LoanInputs,
        baseline: &SimulationOutcome,
        actual: &SimulationOutcome,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if actual.hit_cap || baseline.hit_cap {
            warnings.push(format!(
                "Payoff not reached within {} periods; {:.2} remains outstanding",
                self.config.max_periods(loan.nominal_periods()),
                actual.final_balance.max(baseline.final_balance)
            ));
        }

        if let Some(extras) = loan.active_extras() {
            if let (Some(month), true) = (extras.one_time_period_index, extras.extra_one_time > 0.0) {
                if !actual.one_time_reached {
                    warn!("One-time extra payment for month {} falls after payoff", month);
                    warnings.push(format!(
                        "One-time extra payment scheduled for month {} was not applied: the loan is paid off first",
                        month
                    ));
                } else if actual.one_time_dropped > 0.0 {
                    warn!(
                        "One-time extra payment for month {} reduced by {:.2} to the remaining balance",
                        month, actual.one_time_dropped
                    );
                    warnings.push(format!(
                        "Extra payment in month {} was capped at the remaining balance ({:.2} not applied)",
                        month, actual.one_time_dropped
                    ));
                }
            }
        }

        warnings
    }
}

/// Calculate with the default configuration
pub fn calculate(loan: &LoanInputs) -> LoanResult {
    AmortizationEngine::default().calculate(loan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mortgage() -> LoanInputs {
        LoanInputs::new(300_000.0, 6.5, 30)
    }

    #[test]
    fn test_mortgage_payment_and_interest() {
        let result = calculate(&mortgage());
        assert!(result.is_valid);

        let m = result.metrics.as_ref().unwrap();
        assert_abs_diff_eq!(m.payment, 1896.20, epsilon = 0.01);
        assert_abs_diff_eq!(m.total_interest, 382_633.0, epsilon = 50.0);
        assert_eq!(m.actual_periods, 360);
        assert_eq!(m.baseline_periods, 360);
        assert_eq!(m.interest_saved, 0.0);
        assert_eq!(m.time_saved_months, 0.0);
        assert!(!m.hit_safety_cap);
        assert_eq!(result.yearly_schedule.len(), 30);
        assert_eq!(result.formatted.payment, "$1,896.20");
    }

    #[test]
    fn test_invalid_inputs() {
        for loan in [
            LoanInputs::new(0.0, 6.5, 30),
            LoanInputs::new(300_000.0, -1.0, 30),
            LoanInputs::new(300_000.0, 6.5, 0),
        ] {
            let result = calculate(&loan);
            assert!(!result.is_valid);
            assert!(result.payment().is_none());
            assert!(result.yearly_schedule.is_empty());
            assert!(result.summary.is_empty());
            assert!(result.formatted.payment.is_empty());
            assert!(result.invalid_reason.is_some());
        }
    }

    #[test]
    fn test_extras_never_increase_cost() {
        let base = calculate(&mortgage());
        for extras in [
            ExtraPayments::monthly(200.0),
            ExtraPayments::annual(5_000.0),
            ExtraPayments::one_time(20_000.0, 24),
        ] {
            let with = calculate(&mortgage().with_extras(extras));
            let m = with.metrics.unwrap();
            let b = base.metrics.as_ref().unwrap();
            assert!(m.actual_periods < b.actual_periods);
            assert!(m.total_interest < b.total_interest);
            assert!(m.interest_saved > 0.0);
        }
    }

    #[test]
    fn test_zero_extras_equal_baseline() {
        let base = calculate(&mortgage());
        let zero = calculate(&mortgage().with_extras(ExtraPayments::default()));
        assert_eq!(base.metrics, zero.metrics);
        assert_eq!(base.yearly_schedule, zero.yearly_schedule);
    }

    #[test]
    fn test_idempotent() {
        let loan = mortgage().with_extras(ExtraPayments {
            extra_per_period: 150.0,
            extra_annual: 2_000.0,
            extra_one_time: 10_000.0,
            one_time_period_index: Some(60),
        });
        assert_eq!(calculate(&loan), calculate(&loan));
    }

    #[test]
    fn test_yearly_schedule_consistency() {
        let loan = mortgage().with_extras(ExtraPayments::monthly(300.0));
        let result = calculate(&loan);
        let m = result.metrics.as_ref().unwrap();

        let principal: f64 = result.yearly_schedule.iter().map(|r| r.principal).sum();
        let interest: f64 = result.yearly_schedule.iter().map(|r| r.interest).sum();
        let payments: u32 = result.yearly_schedule.iter().map(|r| r.payments).sum();

        assert_abs_diff_eq!(principal, 300_000.0, epsilon = 0.01);
        assert_abs_diff_eq!(interest, m.total_interest, epsilon = 1e-6);
        assert_eq!(payments, m.actual_periods);

        let last = result.yearly_schedule.last().unwrap();
        assert!(last.ending_balance <= 0.01);
        assert_abs_diff_eq!(last.cumulative_interest, m.total_interest, epsilon = 1e-6);

        // Balance never increases year over year
        for pair in result.yearly_schedule.windows(2) {
            assert!(pair[1].ending_balance <= pair[0].ending_balance);
            assert!(pair[1].cumulative_interest >= pair[0].cumulative_interest);
        }
    }

    #[test]
    fn test_one_time_extra_beyond_payoff() {
        let loan = mortgage().with_extras(ExtraPayments::one_time(50_000.0, 600));
        let result = calculate(&loan);
        let m = result.metrics.as_ref().unwrap();

        assert_eq!(m.actual_periods, 360);
        assert_eq!(m.interest_saved, 0.0);
        assert_eq!(result.yearly_schedule.len(), 30);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("month 600"));
    }

    #[test]
    fn test_one_time_extra_capped_at_balance() {
        let loan = LoanInputs::new(10_000.0, 5.0, 1).with_extras(ExtraPayments::one_time(50_000.0, 2));
        let result = calculate(&loan);
        let m = result.metrics.as_ref().unwrap();

        assert_eq!(m.actual_periods, 2);
        assert_abs_diff_eq!(m.total_paid - m.total_interest, 10_000.0, epsilon = 1e-6);
        assert!(result.warnings.iter().any(|w| w.contains("capped")));
    }

    #[test]
    fn test_accelerated_biweekly_pays_off_early() {
        let monthly = calculate(&mortgage());
        let accelerated = calculate(&mortgage().with_frequency(PaymentFrequency::AcceleratedBiweekly));

        let mp = monthly.payment().unwrap();
        let m = accelerated.metrics.as_ref().unwrap();
        assert_eq!(m.payment, mp / 2.0);
        assert!(m.payoff_months() < 30.0 * 12.0);
        assert!(m.biweekly_comparison.is_none());
    }

    #[test]
    fn test_biweekly_comparison_for_monthly() {
        let result = calculate(&mortgage());
        let cmp = result.metrics.as_ref().unwrap().biweekly_comparison.as_ref().unwrap();

        assert_abs_diff_eq!(cmp.payment, 948.10, epsilon = 0.01);
        assert!(cmp.interest_saved > 0.0);
        assert!(cmp.months_saved > 0.0);
        assert!(result.formatted.biweekly_interest_saved.is_some());
    }

    #[test]
    fn test_biweekly_comparison_can_be_disabled() {
        let config = EngineConfig {
            biweekly_comparison: false,
            ..Default::default()
        };
        let result = AmortizationEngine::new(config).calculate(&mortgage());
        assert!(result.metrics.unwrap().biweekly_comparison.is_none());
    }

    #[test]
    fn test_midpoint_equity() {
        let result = calculate(&mortgage());
        let m = result.metrics.as_ref().unwrap();

        assert_eq!(m.midpoint_period, 180);
        // Year 15 ending balance of a 30-year 6.5% loan
        let balance_at_15 = result.yearly_schedule[14].ending_balance;
        assert_abs_diff_eq!(m.equity_at_midpoint, 300_000.0 - balance_at_15, epsilon = 1e-6);
        assert!(m.equity_at_midpoint < 150_000.0);
    }

    #[test]
    fn test_derived_ratios() {
        let result = calculate(&mortgage());
        let m = result.metrics.as_ref().unwrap();

        assert_abs_diff_eq!(m.daily_interest_cost, 300_000.0 * 0.065 / 365.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.interest_to_principal_ratio, m.total_interest / 300_000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.total_paid, 300_000.0 + m.total_interest, epsilon = 1e-6);
    }

    #[test]
    fn test_safety_cap_bounds_iterations() {
        let engine = AmortizationEngine::default();
        // Payment below the periodic interest never converges
        let plan = PaymentPlan {
            frequency: PaymentFrequency::Monthly,
            periodic_rate: 0.01,
            payment: 50.0,
            max_periods: 24,
        };
        let outcome = engine.simulate(10_000.0, &plan, None, None);

        assert_eq!(outcome.periods, 24);
        assert!(outcome.hit_cap);
        assert!(!outcome.paid_off);
        assert_eq!(outcome.yearly.len(), 2);
    }

    #[test]
    fn test_near_zero_rate_converges() {
        let loan = LoanInputs::new(100_000.0, 0.0001, 30);
        let result = calculate(&loan);
        let m = result.metrics.as_ref().unwrap();

        assert!(!m.hit_safety_cap);
        assert!(m.actual_periods <= 360);
        assert_abs_diff_eq!(m.payment, 100_000.0 / 360.0, epsilon = 0.01);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_extreme_terms_are_invalid_not_panics() {
        for loan in [
            LoanInputs::new(100_000.0, 100_000.0, 30),
            LoanInputs::new(100_000.0, 6.5, 20_000),
            LoanInputs::new(100_000.0, f64::MAX, 30),
        ] {
            let result = calculate(&loan);
            assert!(!result.is_valid);
            assert!(result.payment().is_none());
            assert!(result.formatted.payment.is_empty());
        }
    }

    #[test]
    fn test_highest_accepted_rate_and_term() {
        for frequency in PaymentFrequency::ALL {
            let loan = LoanInputs::new(100_000.0, 100.0, 50).with_frequency(frequency);
            let result = calculate(&loan);
            assert!(result.is_valid);

            let m = result.metrics.as_ref().unwrap();
            assert!(m.payment.is_finite() && m.payment > 0.0);
            assert!(m.total_interest.is_finite());
            assert!(m.actual_periods <= 2 * loan.nominal_periods());
        }
    }

    #[test]
    fn test_vanishing_rate_is_straight_line() {
        let result = calculate(&LoanInputs::new(100_000.0, 1e-14, 30));
        let m = result.metrics.as_ref().unwrap();

        assert!(m.payment.is_finite());
        assert_abs_diff_eq!(m.payment, 100_000.0 / 360.0, epsilon = 1e-6);
        assert_eq!(m.actual_periods, 360);
        assert_eq!(result.formatted.payment, "$277.78");
    }

    #[test]
    fn test_far_future_one_time_extra_ignored() {
        let loan = LoanInputs::new(100_000.0, 6.5, 30)
            .with_frequency(PaymentFrequency::Weekly)
            .with_extras(ExtraPayments::one_time(50_000.0, 991_146_300));
        let result = calculate(&loan);
        let m = result.metrics.as_ref().unwrap();

        assert_eq!(m.actual_periods, 1_560);
        assert_eq!(m.actual_periods, m.baseline_periods);
        assert_eq!(m.interest_saved, 0.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_all_frequencies_pay_off() {
        for frequency in PaymentFrequency::ALL {
            let loan = LoanInputs::new(200_000.0, 5.0, 20).with_frequency(frequency);
            let result = calculate(&loan);
            let m = result.metrics.as_ref().unwrap();

            assert!(!m.hit_safety_cap, "{} hit the cap", frequency);
            assert!(m.actual_periods <= 20 * frequency.periods_per_year());
            assert_eq!(
                result.yearly_schedule.iter().map(|r| r.payments).sum::<u32>(),
                m.actual_periods
            );
        }
    }
}
