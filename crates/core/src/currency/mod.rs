//! Multi-currency price conversion and formatting.
//!
//! Product prices are stored once, in [`BASE_CURRENCY`]. Display code builds
//! a [`PriceFormatter`] (or a [`RegionalFormatter`]) for the shopper's
//! currency and passes it explicitly to whatever renders prices.

pub mod format;
pub mod regional;
pub mod table;

pub use format::{FormatOptions, PriceFormatter, Savings, convert_between};
pub use regional::RegionalFormatter;
pub use table::{BASE_CURRENCY, Currency, CurrencyCode, SymbolPosition, UnknownCurrency};
