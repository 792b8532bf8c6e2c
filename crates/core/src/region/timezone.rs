//! IANA timezone → market heuristic used when IP lookup fails.

use crate::currency::CurrencyCode;

/// Best guess derived from a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneHint {
    pub country: &'static str,
    pub country_code: &'static str,
    pub currency: CurrencyCode,
    pub language: &'static str,
}

const fn hint(
    country: &'static str,
    country_code: &'static str,
    currency: CurrencyCode,
    language: &'static str,
) -> TimezoneHint {
    TimezoneHint {
        country,
        country_code,
        currency,
        language,
    }
}

const TIMEZONES: &[(&str, TimezoneHint)] = &[
    ("Europe/Moscow", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Europe/Samara", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Europe/Kaliningrad", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Asia/Yekaterinburg", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Asia/Novosibirsk", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Asia/Krasnoyarsk", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Asia/Irkutsk", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Asia/Vladivostok", hint("Russia", "RU", CurrencyCode::RUB, "ru")),
    ("Europe/Minsk", hint("Belarus", "BY", CurrencyCode::BYN, "ru")),
    ("Europe/Kiev", hint("Ukraine", "UA", CurrencyCode::UAH, "uk")),
    ("Europe/Kyiv", hint("Ukraine", "UA", CurrencyCode::UAH, "uk")),
    ("Asia/Almaty", hint("Kazakhstan", "KZ", CurrencyCode::KZT, "ru")),
    ("Asia/Astana", hint("Kazakhstan", "KZ", CurrencyCode::KZT, "ru")),
    ("Europe/London", hint("United Kingdom", "GB", CurrencyCode::GBP, "en")),
    ("Europe/Berlin", hint("Germany", "DE", CurrencyCode::EUR, "de")),
    ("Europe/Paris", hint("France", "FR", CurrencyCode::EUR, "fr")),
    ("Europe/Madrid", hint("Spain", "ES", CurrencyCode::EUR, "es")),
    ("Europe/Rome", hint("Italy", "IT", CurrencyCode::EUR, "it")),
    ("Europe/Amsterdam", hint("Netherlands", "NL", CurrencyCode::EUR, "nl")),
    ("America/New_York", hint("United States", "US", CurrencyCode::USD, "en")),
    ("America/Chicago", hint("United States", "US", CurrencyCode::USD, "en")),
    ("America/Denver", hint("United States", "US", CurrencyCode::USD, "en")),
    ("America/Los_Angeles", hint("United States", "US", CurrencyCode::USD, "en")),
    ("Asia/Shanghai", hint("China", "CN", CurrencyCode::CNY, "zh")),
    ("Asia/Tokyo", hint("Japan", "JP", CurrencyCode::JPY, "ja")),
];

/// Look up a timezone, ignoring surrounding whitespace.
#[must_use]
pub fn lookup(timezone: &str) -> Option<&'static TimezoneHint> {
    let timezone = timezone.trim();
    TIMEZONES
        .iter()
        .find(|(name, _)| *name == timezone)
        .map(|(_, hint)| hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_timezone() {
        let hint = lookup("Asia/Almaty");
        assert_eq!(hint.map(|h| h.currency), Some(CurrencyCode::KZT));
        assert_eq!(hint.map(|h| h.country_code), Some("KZ"));
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(lookup("Antarctica/Troll").is_none());
        assert!(lookup("").is_none());
    }
}
