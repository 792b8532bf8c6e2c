//! Country-aware presentation policy on top of [`PriceFormatter`].

use rust_decimal::Decimal;

use super::format::{FormatOptions, PriceFormatter};
use super::table::CurrencyCode;

/// Markets where a currency is conventionally shown without minor units.
const WHOLE_NUMBER_MARKETS: &[(&str, CurrencyCode)] = &[
    ("RU", CurrencyCode::RUB),
    ("KZ", CurrencyCode::KZT),
    ("UA", CurrencyCode::UAH),
    ("JP", CurrencyCode::JPY),
];

/// A [`PriceFormatter`] bound to a shopper's country and language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalFormatter {
    formatter: PriceFormatter,
    country_code: String,
    language: String,
}

impl RegionalFormatter {
    /// Create a regional formatter.
    ///
    /// `country_code` is an ISO 3166 alpha-2 code; `language` is a primary
    /// language subtag such as `"ru"`. Both are matched case-insensitively.
    #[must_use]
    pub fn new(currency: CurrencyCode, country_code: &str, language: &str) -> Self {
        Self {
            formatter: PriceFormatter::new(currency),
            country_code: country_code.trim().to_ascii_uppercase(),
            language: language.trim().to_ascii_lowercase(),
        }
    }

    /// The underlying currency formatter.
    #[must_use]
    pub const fn formatter(&self) -> &PriceFormatter {
        &self.formatter
    }

    /// Whether prices are shown without minor units in this market.
    #[must_use]
    pub fn suppresses_decimals(&self) -> bool {
        let currency = self.formatter.currency();
        currency.info().precision == 0
            || WHOLE_NUMBER_MARKETS
                .iter()
                .any(|(country, code)| *code == currency && *country == self.country_code)
    }

    /// Format a base-currency price following the market's conventions.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let options = if self.suppresses_decimals() {
            FormatOptions {
                precision: Some(0),
                ..FormatOptions::default()
            }
        } else {
            FormatOptions::default()
        };
        self.formatter.format(amount, &options)
    }

    /// Format a price range such as "from-to" on a collection card.
    #[must_use]
    pub fn format_range(&self, min: Decimal, max: Decimal) -> String {
        if min == max {
            return self.format(min);
        }
        format!("{} – {}", self.format(min), self.format(max))
    }

    /// Tax disclosure shown next to prices.
    #[must_use]
    pub fn tax_label(&self) -> &'static str {
        if self.country_code == "US" {
            return "Sales tax calculated at checkout";
        }

        match self.language.as_str() {
            "ru" | "be" => "Цена включает НДС",
            "uk" => "Ціна включає ПДВ",
            "kk" => "Бағаға ҚҚС кіреді",
            "de" => "inkl. MwSt.",
            "zh" => "价格含增值税",
            "ja" => "税込",
            _ => "Incl. VAT",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_uah_in_ukraine_drops_kopiyky() {
        let ua = RegionalFormatter::new(CurrencyCode::UAH, "ua", "uk");
        assert!(ua.suppresses_decimals());
        // 1000 RUB * 0.45 = 450 UAH
        assert_eq!(ua.format(dec("1000")), "450 ₴");
    }

    #[test]
    fn test_uah_elsewhere_keeps_decimals() {
        let de = RegionalFormatter::new(CurrencyCode::UAH, "DE", "de");
        assert!(!de.suppresses_decimals());
        assert_eq!(de.format(dec("1000")), "450,00 ₴");
    }

    #[test]
    fn test_zero_precision_currency_always_whole() {
        let jp = RegionalFormatter::new(CurrencyCode::JPY, "US", "en");
        assert!(jp.suppresses_decimals());
    }

    #[test]
    fn test_format_range() {
        let ru = RegionalFormatter::new(CurrencyCode::RUB, "RU", "ru");
        assert_eq!(ru.format_range(dec("500"), dec("1500")), "500 ₽ – 1 500 ₽");
        assert_eq!(ru.format_range(dec("500"), dec("500")), "500 ₽");
    }

    #[test]
    fn test_tax_label_by_locale() {
        assert_eq!(
            RegionalFormatter::new(CurrencyCode::RUB, "RU", "ru").tax_label(),
            "Цена включает НДС"
        );
        assert_eq!(
            RegionalFormatter::new(CurrencyCode::USD, "US", "en").tax_label(),
            "Sales tax calculated at checkout"
        );
        assert_eq!(
            RegionalFormatter::new(CurrencyCode::GBP, "GB", "en").tax_label(),
            "Incl. VAT"
        );
    }
}
