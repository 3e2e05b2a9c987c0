//! Engine configuration
//!
//! Defaults match the calculator widgets. `from_env` overlays environment
//! variables on top of the defaults:
//!
//! | Variable | Field |
//! |---|---|
//! | `AMORT_PAYOFF_EPSILON` | `payoff_epsilon` |
//! | `AMORT_SAFETY_CAP_MULTIPLIER` | `safety_cap_multiplier` |
//! | `AMORT_BIWEEKLY_COMPARISON` | `biweekly_comparison` |
//! | `AMORT_LOCALE` | `currency` (locale preset) |
//! | `AMORT_CURRENCY_SYMBOL` | `currency.symbol` |

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::format::{CurrencyFormat, Locale};

/// Balance at or below which a loan counts as paid off
pub const DEFAULT_PAYOFF_EPSILON: f64 = 0.01;

/// A simulation never runs more than this many times the nominal period count
pub const DEFAULT_SAFETY_CAP_MULTIPLIER: u32 = 2;

/// Configuration for the amortization engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub payoff_epsilon: f64,

    /// Iteration bound as a multiple of `term_years * periods_per_year`
    pub safety_cap_multiplier: u32,

    /// Produce the monthly vs. bi-weekly comparison for monthly loans
    pub biweekly_comparison: bool,

    /// Display formatting for the formatted strings and summary
    pub currency: CurrencyFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payoff_epsilon: DEFAULT_PAYOFF_EPSILON,
            safety_cap_multiplier: DEFAULT_SAFETY_CAP_MULTIPLIER,
            biweekly_comparison: true,
            currency: CurrencyFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `AMORT_*` environment variables
    pub fn from_env() -> Result<Self, LoanError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("AMORT_PAYOFF_EPSILON") {
            let epsilon: f64 = raw
                .trim()
                .parse()
                .map_err(|_| LoanError::invalid_config("AMORT_PAYOFF_EPSILON", format!("'{}' is not a number", raw)))?;
            config = config.with_payoff_epsilon(epsilon)?;
        }

        if let Some(raw) = lookup("AMORT_SAFETY_CAP_MULTIPLIER") {
            let multiplier: u32 = raw.trim().parse().map_err(|_| {
                LoanError::invalid_config("AMORT_SAFETY_CAP_MULTIPLIER", format!("'{}' is not a whole number", raw))
            })?;
            config = config.with_safety_cap_multiplier(multiplier)?;
        }

        if let Some(raw) = lookup("AMORT_BIWEEKLY_COMPARISON") {
            config.biweekly_comparison = parse_flag(&raw)
                .ok_or_else(|| LoanError::invalid_config("AMORT_BIWEEKLY_COMPARISON", format!("'{}' is not a boolean", raw)))?;
        }

        if let Some(raw) = lookup("AMORT_LOCALE") {
            let locale: Locale = raw.parse()?;
            config.currency = CurrencyFormat::for_locale(locale);
        }

        if let Some(symbol) = lookup("AMORT_CURRENCY_SYMBOL") {
            config.currency.symbol = symbol;
        }

        Ok(config)
    }

    pub fn with_payoff_epsilon(mut self, epsilon: f64) -> Result<Self, LoanError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(LoanError::invalid_config("payoff_epsilon", "must be zero or positive"));
        }
        self.payoff_epsilon = epsilon;
        Ok(self)
    }

    /// The multiplier must be at least 1 so a payoff within the nominal term is always reachable
    pub fn with_safety_cap_multiplier(mut self, multiplier: u32) -> Result<Self, LoanError> {
        if multiplier == 0 {
            return Err(LoanError::invalid_config("safety_cap_multiplier", "must be at least 1"));
        }
        self.safety_cap_multiplier = multiplier;
        Ok(self)
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Maximum number of periods a simulation may run
    pub fn max_periods(&self, nominal_periods: u32) -> u32 {
        nominal_periods.saturating_mul(self.safety_cap_multiplier)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.payoff_epsilon, 0.01);
        assert_eq!(config.safety_cap_multiplier, 2);
        assert!(config.biweekly_comparison);
        assert_eq!(config.max_periods(360), 720);
        assert_eq!(config.currency.symbol, "$");
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("AMORT_PAYOFF_EPSILON", "0.001"),
            ("AMORT_SAFETY_CAP_MULTIPLIER", "3"),
            ("AMORT_BIWEEKLY_COMPARISON", "off"),
            ("AMORT_LOCALE", "de-DE"),
        ]))
        .unwrap();

        assert_eq!(config.payoff_epsilon, 0.001);
        assert_eq!(config.max_periods(100), 300);
        assert!(!config.biweekly_comparison);
        assert_eq!(config.currency, CurrencyFormat::for_locale(Locale::DeDe));
    }

    #[test]
    fn test_symbol_override_after_locale() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("AMORT_LOCALE", "fr-FR"),
            ("AMORT_CURRENCY_SYMBOL", "CHF"),
        ]))
        .unwrap();
        assert_eq!(config.currency.symbol, "CHF");
        assert_eq!(config.currency.decimal_separator, ",");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(EngineConfig::from_lookup(lookup_from(&[("AMORT_PAYOFF_EPSILON", "abc")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[("AMORT_SAFETY_CAP_MULTIPLIER", "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup_from(&[("AMORT_BIWEEKLY_COMPARISON", "maybe")])).is_err());
    }
}
