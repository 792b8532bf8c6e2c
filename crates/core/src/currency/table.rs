//! Static currency table.
//!
//! Exchange rates are expressed against a common unit in which the base
//! currency (RUB) has rate 1. Converting between two currencies always goes
//! through that unit, so adding a currency means adding one row.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a currency symbol sits relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$12.00`
    Prefix,
    /// `12 ₽`
    Suffix,
}

/// ISO 4217 currency codes supported by the storefront.
#[allow(clippy::upper_case_acronyms)] // ISO 4217 codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    RUB,
    USD,
    EUR,
    GBP,
    KZT,
    BYN,
    UAH,
    CNY,
    JPY,
}

/// The currency all product prices are stored in.
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::RUB;

/// Immutable description of one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Units of this currency per one common unit.
    pub exchange_rate: Decimal,
    /// BCP 47 locale the separators follow.
    pub locale: &'static str,
    /// Decimal digits shown by default.
    pub precision: u32,
    pub group_separator: &'static str,
    pub decimal_separator: &'static str,
    pub symbol_position: SymbolPosition,
    /// Whether a space separates symbol and amount.
    pub symbol_spaced: bool,
}

/// Error returned when a currency code is not in the table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl CurrencyCode {
    /// Every supported code, in table order.
    pub const ALL: [Self; 9] = [
        Self::RUB,
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::KZT,
        Self::BYN,
        Self::UAH,
        Self::CNY,
        Self::JPY,
    ];

    /// Three-letter code, e.g. `"RUB"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RUB => "RUB",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::KZT => "KZT",
            Self::BYN => "BYN",
            Self::UAH => "UAH",
            Self::CNY => "CNY",
            Self::JPY => "JPY",
        }
    }

    /// Look up this currency's descriptor.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // Every variant has a row; the table is ordered like `ALL`
    pub fn info(self) -> &'static Currency {
        &CURRENCIES[self as usize]
    }

    /// Parse a code case-insensitively, returning `None` when unsupported.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// Static table, indexed by `CurrencyCode as usize`.
static CURRENCIES: [Currency; 9] = [
    Currency {
        code: CurrencyCode::RUB,
        name: "Russian Ruble",
        symbol: "₽",
        exchange_rate: Decimal::ONE,
        locale: "ru-RU",
        precision: 0,
        group_separator: " ",
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
        symbol_spaced: true,
    },
    Currency {
        code: CurrencyCode::USD,
        name: "US Dollar",
        symbol: "$",
        exchange_rate: Decimal::from_parts(11, 0, 0, false, 3),
        locale: "en-US",
        precision: 2,
        group_separator: ",",
        decimal_separator: ".",
        symbol_position: SymbolPosition::Prefix,
        symbol_spaced: false,
    },
    Currency {
        code: CurrencyCode::EUR,
        name: "Euro",
        symbol: "€",
        exchange_rate: Decimal::from_parts(101, 0, 0, false, 4),
        locale: "de-DE",
        precision: 2,
        group_separator: ".",
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
        symbol_spaced: true,
    },
    Currency {
        code: CurrencyCode::GBP,
        name: "British Pound",
        symbol: "£",
        exchange_rate: Decimal::from_parts(87, 0, 0, false, 4),
        locale: "en-GB",
        precision: 2,
        group_separator: ",",
        decimal_separator: ".",
        symbol_position: SymbolPosition::Prefix,
        symbol_spaced: false,
    },
    Currency {
        code: CurrencyCode::KZT,
        name: "Kazakhstani Tenge",
        symbol: "₸",
        exchange_rate: Decimal::from_parts(52, 0, 0, false, 1),
        locale: "kk-KZ",
        precision: 0,
        group_separator: " ",
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
        symbol_spaced: true,
    },
    Currency {
        code: CurrencyCode::BYN,
        name: "Belarusian Ruble",
        symbol: "Br",
        exchange_rate: Decimal::from_parts(35, 0, 0, false, 3),
        locale: "be-BY",
        precision: 2,
        group_separator: " ",
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
        symbol_spaced: true,
    },
    Currency {
        code: CurrencyCode::UAH,
        name: "Ukrainian Hryvnia",
        symbol: "₴",
        exchange_rate: Decimal::from_parts(45, 0, 0, false, 2),
        locale: "uk-UA",
        precision: 2,
        group_separator: " ",
        decimal_separator: ",",
        symbol_position: SymbolPosition::Suffix,
        symbol_spaced: true,
    },
    Currency {
        code: CurrencyCode::CNY,
        name: "Chinese Yuan",
        symbol: "¥",
        exchange_rate: Decimal::from_parts(79, 0, 0, false, 3),
        locale: "zh-CN",
        precision: 2,
        group_separator: ",",
        decimal_separator: ".",
        symbol_position: SymbolPosition::Prefix,
        symbol_spaced: false,
    },
    Currency {
        code: CurrencyCode::JPY,
        name: "Japanese Yen",
        symbol: "¥",
        exchange_rate: Decimal::from_parts(16, 0, 0, false, 1),
        locale: "ja-JP",
        precision: 0,
        group_separator: ",",
        decimal_separator: ".",
        symbol_position: SymbolPosition::Prefix,
        symbol_spaced: false,
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_codes() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.info().code, code);
            assert!(code.info().exchange_rate > Decimal::ZERO);
        }
    }

    #[test]
    fn test_base_currency_has_unit_rate() {
        assert_eq!(BASE_CURRENCY.info().exchange_rate, Decimal::ONE);
    }

    #[test]
    fn test_rates_are_exact() {
        assert_eq!(CurrencyCode::USD.info().exchange_rate.to_string(), "0.011");
        assert_eq!(CurrencyCode::KZT.info().exchange_rate.to_string(), "5.2");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::from_code(" Eur "), Some(CurrencyCode::EUR));
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&CurrencyCode::KZT).unwrap();
        assert_eq!(json, "\"KZT\"");
    }
}
