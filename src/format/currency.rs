//! Number and currency formatting for display strings
//!
//! Values are rounded to two decimals here and nowhere else.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Where the currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolPosition {
    /// `$1,234.56`
    Prefix,
    /// `1.234,56 €`
    Suffix,
}

/// Display locales with number-formatting presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "de-DE")]
    DeDe,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EsEs => "es-ES",
            Locale::PtBr => "pt-BR",
            Locale::FrFr => "fr-FR",
            Locale::DeDe => "de-DE",
        }
    }
}

impl FromStr for Locale {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.trim().to_ascii_lowercase().replace('_', "-");
        match lang.split('-').next().unwrap_or_default() {
            "en" => Ok(Locale::EnUs),
            "es" => Ok(Locale::EsEs),
            "pt" => Ok(Locale::PtBr),
            "fr" => Ok(Locale::FrFr),
            "de" => Ok(Locale::DeDe),
            _ => Err(LoanError::invalid_config("locale", format!("unsupported locale '{}'", s))),
        }
    }
}

/// Currency display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::for_locale(Locale::EnUs)
    }
}

impl CurrencyFormat {
    /// Preset grouping and symbol for a locale
    pub fn for_locale(locale: Locale) -> Self {
        let (symbol, position, thousands, decimal) = match locale {
            Locale::EnUs => ("$", SymbolPosition::Prefix, ",", "."),
            Locale::EsEs => ("€", SymbolPosition::Suffix, ".", ","),
            Locale::PtBr => ("R$", SymbolPosition::Prefix, ".", ","),
            Locale::FrFr => ("€", SymbolPosition::Suffix, "\u{202f}", ","),
            Locale::DeDe => ("€", SymbolPosition::Suffix, ".", ","),
        };
        Self {
            symbol: symbol.to_string(),
            symbol_position: position,
            thousands_separator: thousands.to_string(),
            decimal_separator: decimal.to_string(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Group and round a plain number to the given decimals
    pub fn number(&self, value: f64, decimals: usize) -> String {
        let rounded = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (rounded.as_str(), None),
        };

        let digits = int_part.as_bytes();
        let mut grouped = String::with_capacity(rounded.len() + digits.len() / 3);
        for (i, d) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(*d as char);
        }
        if let Some(frac) = frac_part {
            grouped.push_str(&self.decimal_separator);
            grouped.push_str(frac);
        }

        // "-0.00" reads badly
        let is_zero = rounded.bytes().all(|b| b == b'0' || b == b'.');
        if value < 0.0 && !is_zero {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// Format a currency amount with two decimals
    pub fn money(&self, value: f64) -> String {
        let number = self.number(value.abs(), 2);
        let sign = if value < 0.0 && number.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
            "-"
        } else {
            ""
        };
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, number),
            SymbolPosition::Suffix => format!("{}{} {}", sign, number, self.symbol),
        }
    }

    /// Format a ratio (0.25) as a percentage (25.00%)
    pub fn percent(&self, ratio: f64) -> String {
        format!("{}%", self.number(ratio * 100.0, 2))
    }
}

/// Render a month count as "2 years 3 months"
pub fn format_duration_months(months: f64) -> String {
    let total = months.round().max(0.0) as u64;
    let years = total / 12;
    let rem = total % 12;

    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (years, rem) {
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}
