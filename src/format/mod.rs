//! Presentation boundary: display strings, summary text and chart series
//!
//! Nothing here feeds back into the calculation; values are rounded only
//! when turned into strings.

mod chart;
mod currency;
mod summary;

pub use chart::ChartSeries;
pub use currency::{format_duration_months, CurrencyFormat, Locale, SymbolPosition};
pub use summary::{fill_template, summary_sentence, FormattedMetrics, SAVINGS_TEMPLATE, SUMMARY_TEMPLATE};
