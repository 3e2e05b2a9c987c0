//! Loan input structures

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Highest accepted nominal annual rate, in percent
pub const MAX_ANNUAL_RATE_PERCENT: f64 = 100.0;

/// Longest accepted term
pub const MAX_TERM_YEARS: u32 = 50;

/// How often payments are made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    /// 26 payments per year, each sized from a 26-period annuity
    Biweekly,
    /// 26 payments per year, each half of the monthly annuity payment
    AcceleratedBiweekly,
    Weekly,
    /// Twice a month (24 per year)
    SemiMonthly,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 5] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Biweekly,
        PaymentFrequency::AcceleratedBiweekly,
        PaymentFrequency::Weekly,
        PaymentFrequency::SemiMonthly,
    ];

    /// Number of payment periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::AcceleratedBiweekly => 26,
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::SemiMonthly => 24,
        }
    }

    /// Stable identifier used in CSV and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::AcceleratedBiweekly => "acceleratedBiweekly",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::SemiMonthly => "semiMonthly",
        }
    }

    /// Human-readable label for summaries
    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Biweekly => "bi-weekly",
            PaymentFrequency::AcceleratedBiweekly => "accelerated bi-weekly",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::SemiMonthly => "semi-monthly",
        }
    }

    /// Convert a monthly amount into the equivalent per-period amount
    pub fn per_period_from_monthly(&self, monthly_amount: f64) -> f64 {
        monthly_amount * 12.0 / self.periods_per_year() as f64
    }

    /// First period ending at or after the given 1-based month.
    ///
    /// `None` when that period does not fit in a `u32`, i.e. is never reached.
    pub fn period_for_month(&self, month: u32) -> Option<u32> {
        let ppy = self.periods_per_year();
        if ppy == 12 {
            return Some(month);
        }
        u32::try_from((month as u64 * ppy as u64).div_ceil(12)).ok()
    }

    /// Date on which the given number of periods after `start` ends
    pub fn advance_date(&self, start: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match self {
            PaymentFrequency::Monthly => start.checked_add_months(Months::new(periods)),
            PaymentFrequency::Biweekly | PaymentFrequency::AcceleratedBiweekly => {
                start.checked_add_days(Days::new(periods as u64 * 14))
            }
            PaymentFrequency::Weekly => start.checked_add_days(Days::new(periods as u64 * 7)),
            PaymentFrequency::SemiMonthly => {
                let date = start.checked_add_months(Months::new(periods / 2))?;
                if periods % 2 == 1 {
                    date.checked_add_days(Days::new(15))
                } else {
                    Some(date)
                }
            }
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "biweekly" => Ok(PaymentFrequency::Biweekly),
            "acceleratedbiweekly" => Ok(PaymentFrequency::AcceleratedBiweekly),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "semimonthly" => Ok(PaymentFrequency::SemiMonthly),
            _ => Err(LoanError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Optional prepayments on top of the scheduled payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraPayments {
    /// Flat add-on expressed per month, spread across periods by frequency
    pub extra_per_period: f64,

    /// Lump sum paid at the period completing each loan year
    pub extra_annual: f64,

    /// Single lump sum
    pub extra_one_time: f64,

    /// 1-based month in which the one-time lump sum is paid
    pub one_time_period_index: Option<u32>,
}

impl ExtraPayments {
    pub fn monthly(amount: f64) -> Self {
        Self {
            extra_per_period: amount,
            ..Default::default()
        }
    }

    pub fn annual(amount: f64) -> Self {
        Self {
            extra_annual: amount,
            ..Default::default()
        }
    }

    pub fn one_time(amount: f64, month: u32) -> Self {
        Self {
            extra_one_time: amount,
            one_time_period_index: Some(month),
            ..Default::default()
        }
    }

    /// True when at least one extra amount would actually be paid
    pub fn is_active(&self) -> bool {
        self.extra_per_period > 0.0
            || self.extra_annual > 0.0
            || (self.extra_one_time > 0.0 && self.one_time_period_index.is_some())
    }

    /// Per-period extra amount in a schedule of the given frequency
    pub fn amount_for_period(&self, period: u32, frequency: PaymentFrequency) -> f64 {
        let mut extra = 0.0;

        if self.extra_per_period > 0.0 {
            extra += frequency.per_period_from_monthly(self.extra_per_period);
        }

        if self.extra_annual > 0.0 && period % frequency.periods_per_year() == 0 {
            extra += self.extra_annual;
        }

        if let Some(month) = self.one_time_period_index {
            if self.extra_one_time > 0.0 && frequency.period_for_month(month) == Some(period) {
                extra += self.extra_one_time;
            }
        }

        extra
    }

    pub fn validate(&self) -> Result<(), LoanError> {
        for (field, value) in [
            ("extra_per_period", self.extra_per_period),
            ("extra_annual", self.extra_annual),
            ("extra_one_time", self.extra_one_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoanError::invalid_input(field, value, "must be zero or positive"));
            }
        }
        if self.one_time_period_index == Some(0) {
            return Err(LoanError::invalid_input(
                "one_time_period_index",
                0,
                "months are 1-based",
            ));
        }
        Ok(())
    }
}

/// Loan terms fed to the amortization engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInputs {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate in percent (6.5 = 6.5%)
    pub annual_rate_percent: f64,

    /// Term in whole years
    pub term_years: u32,

    #[serde(default)]
    pub frequency: PaymentFrequency,

    #[serde(default)]
    pub extras: Option<ExtraPayments>,

    /// First payment period starts on this date
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

impl LoanInputs {
    /// Monthly loan with no extra payments
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
            frequency: PaymentFrequency::Monthly,
            extras: None,
            start_date: default_start_date(),
        }
    }

    pub fn with_frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_extras(mut self, extras: ExtraPayments) -> Self {
        self.extras = Some(extras);
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Periods per year for the configured frequency
    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Annual rate as a decimal
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0
    }

    /// Interest rate per payment period
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate() / self.periods_per_year() as f64
    }

    /// Nominal number of periods over the full term
    pub fn nominal_periods(&self) -> u32 {
        self.term_years.saturating_mul(self.periods_per_year())
    }

    /// Extra payments that will actually be paid, if any
    pub fn active_extras(&self) -> Option<&ExtraPayments> {
        self.extras.as_ref().filter(|e| e.is_active())
    }

    /// Check the inputs required for a computation to proceed
    pub fn validate(&self) -> Result<(), LoanError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(LoanError::invalid_input(
                "principal",
                self.principal,
                "must be greater than zero",
            ));
        }
        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent <= 0.0 {
            return Err(LoanError::invalid_input(
                "annual_rate_percent",
                self.annual_rate_percent,
                "must be greater than zero",
            ));
        }
        if self.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
            return Err(LoanError::invalid_input(
                "annual_rate_percent",
                self.annual_rate_percent,
                "must not exceed 100 percent",
            ));
        }
        if self.term_years == 0 {
            return Err(LoanError::invalid_input(
                "term_years",
                self.term_years,
                "must be at least one year",
            ));
        }
        if self.term_years > MAX_TERM_YEARS {
            return Err(LoanError::invalid_input(
                "term_years",
                self.term_years,
                "must not exceed 50 years",
            ));
        }
        if let Some(extras) = &self.extras {
            extras.validate()?;
        }
        Ok(())
    }
}
