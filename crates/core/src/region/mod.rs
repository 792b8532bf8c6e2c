//! Best-effort detection of the shopper's country, currency and language.
//!
//! # Fallback chain
//!
//! ```text
//! Start ──▶ IP lookup ──ok──▶ Detected(Ip)
//!              │
//!      error / timeout / malformed
//!              ▼
//!        timezone table ──hit──▶ Detected(Timezone)
//!              │
//!             miss
//!              ▼
//!          Fallback (locale language, base currency, "Unknown")
//! ```
//!
//! Detection never fails and never waits longer than the configured
//! timeout. Its result only seeds defaults; everything works without it.

pub mod timezone;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::{BASE_CURRENCY, CurrencyCode};

/// Country name used when nothing could be determined.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Language used when even the locale is unusable.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default bound on the IP lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Errors from an [`IpLookup`] implementation.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with a non-success status.
    #[error("lookup service returned status {0}")]
    Status(u16),

    /// Service answered with something we cannot use.
    #[error("malformed lookup response: {0}")]
    Malformed(String),

    /// Lookup did not finish in time.
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Lookup is disabled for this session.
    #[error("IP lookup disabled")]
    Disabled,
}

/// Response of an IP geolocation service (ipapi-style field names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpLocation {
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Comma-separated language tags, e.g. `"ru-RU,tt,xal"`.
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Set by some services instead of an HTTP error status.
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// An IP geolocation service.
pub trait IpLookup {
    /// Look up the caller's location.
    fn lookup(&self) -> impl Future<Output = Result<IpLocation, LookupError>> + Send;
}

/// A lookup that always fails, for offline sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl IpLookup for NoLookup {
    async fn lookup(&self) -> Result<IpLocation, LookupError> {
        Err(LookupError::Disabled)
    }
}

/// What the client runtime reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientEnvironment {
    /// Resolved IANA timezone, e.g. `"Europe/Moscow"`.
    pub timezone: Option<String>,
    /// Locale string, e.g. `"ru-RU"` or `"en_US.UTF-8"`.
    pub locale: Option<String>,
}

/// Which step of the chain produced a [`Detection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Ip,
    Timezone,
    Fallback,
}

/// Detected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub country: String,
    pub country_code: Option<String>,
    pub currency: CurrencyCode,
    pub language: String,
    pub timezone: Option<String>,
    pub source: DetectionSource,
}

/// Runs the fallback chain.
#[derive(Debug, Clone)]
pub struct RegionDetector<L> {
    lookup: L,
    timeout: Duration,
    environment: ClientEnvironment,
}

impl<L: IpLookup> RegionDetector<L> {
    /// Create a detector with the default timeout.
    pub const fn new(lookup: L, environment: ClientEnvironment) -> Self {
        Self {
            lookup,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            environment,
        }
    }

    /// Override the IP lookup timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Detect the region. Never fails.
    pub async fn detect(&self) -> Detection {
        let result = match tokio::time::timeout(self.timeout, self.lookup.lookup()).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        };

        match result.and_then(|location| from_ip(&location, &self.environment)) {
            Ok(detection) => {
                tracing::info!(country = %detection.country, currency = %detection.currency, "Region detected from IP");
                detection
            }
            Err(e) => {
                tracing::debug!(error = %e, "IP lookup failed; falling back to timezone");
                let detection = from_environment(&self.environment);
                tracing::info!(
                    country = %detection.country,
                    currency = %detection.currency,
                    source = ?detection.source,
                    "Region detected without IP lookup"
                );
                detection
            }
        }
    }
}

/// Build a detection from a lookup response.
///
/// # Errors
///
/// Returns [`LookupError::Malformed`] if the response has no usable country.
pub fn from_ip(location: &IpLocation, environment: &ClientEnvironment) -> Result<Detection, LookupError> {
    if location.error == Some(true) {
        return Err(LookupError::Malformed(
            location
                .reason
                .clone()
                .unwrap_or_else(|| "service reported an error".to_string()),
        ));
    }

    let country_code = location
        .country_code
        .as_deref()
        .map(str::trim)
        .filter(|code| code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase)
        .ok_or_else(|| LookupError::Malformed("missing country_code".to_string()))?;

    let country = location
        .country_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| country_code.clone(), String::from);

    let currency = location
        .currency
        .as_deref()
        .and_then(CurrencyCode::from_code)
        .unwrap_or(BASE_CURRENCY);

    let language = location
        .languages
        .as_deref()
        .and_then(|tags| tags.split(',').next())
        .and_then(primary_subtag)
        .unwrap_or_else(|| locale_language(environment.locale.as_deref()));

    Ok(Detection {
        country,
        country_code: Some(country_code),
        currency,
        language,
        timezone: location.timezone.clone().or_else(|| environment.timezone.clone()),
        source: DetectionSource::Ip,
    })
}

/// Timezone heuristic, then the final fallback.
#[must_use]
pub fn from_environment(environment: &ClientEnvironment) -> Detection {
    if let Some(tz) = environment.timezone.as_deref()
        && let Some(hint) = timezone::lookup(tz)
    {
        return Detection {
            country: hint.country.to_string(),
            country_code: Some(hint.country_code.to_string()),
            currency: hint.currency,
            language: hint.language.to_string(),
            timezone: Some(tz.trim().to_string()),
            source: DetectionSource::Timezone,
        };
    }

    fallback(environment)
}

/// Locale language, base currency, unknown country.
#[must_use]
pub fn fallback(environment: &ClientEnvironment) -> Detection {
    Detection {
        country: UNKNOWN_COUNTRY.to_string(),
        country_code: None,
        currency: BASE_CURRENCY,
        language: locale_language(environment.locale.as_deref()),
        timezone: environment.timezone.clone(),
        source: DetectionSource::Fallback,
    }
}

/// Primary language subtag of a locale, or [`DEFAULT_LANGUAGE`].
#[must_use]
pub fn locale_language(locale: Option<&str>) -> String {
    locale
        .and_then(primary_subtag)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// `"ru-RU"` → `"ru"`, `"en_US.UTF-8"` → `"en"`; `None` for `"C"`/`"POSIX"`/garbage.
fn primary_subtag(tag: &str) -> Option<String> {
    let primary = tag
        .trim()
        .split(['-', '_', '.', '@'])
        .next()?
        .to_ascii_lowercase();

    let valid = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    valid.then_some(primary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedLookup(IpLocation);

    impl IpLookup for FixedLookup {
        async fn lookup(&self) -> Result<IpLocation, LookupError> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    impl IpLookup for FailingLookup {
        async fn lookup(&self) -> Result<IpLocation, LookupError> {
            Err(LookupError::Network("connection refused".to_string()))
        }
    }

    struct HangingLookup;

    impl IpLookup for HangingLookup {
        async fn lookup(&self) -> Result<IpLocation, LookupError> {
            std::future::pending().await
        }
    }

    fn env(timezone: Option<&str>, locale: Option<&str>) -> ClientEnvironment {
        ClientEnvironment {
            timezone: timezone.map(String::from),
            locale: locale.map(String::from),
        }
    }

    fn kazakhstan() -> IpLocation {
        IpLocation {
            country_name: Some("Kazakhstan".to_string()),
            country_code: Some("kz".to_string()),
            currency: Some("KZT".to_string()),
            languages: Some("kk,ru".to_string()),
            timezone: Some("Asia/Almaty".to_string()),
            ..IpLocation::default()
        }
    }

    #[tokio::test]
    async fn test_ip_success() {
        let detector = RegionDetector::new(FixedLookup(kazakhstan()), env(None, Some("en-US")));
        let detection = detector.detect().await;

        assert_eq!(detection.source, DetectionSource::Ip);
        assert_eq!(detection.country, "Kazakhstan");
        assert_eq!(detection.country_code.as_deref(), Some("KZ"));
        assert_eq!(detection.currency, CurrencyCode::KZT);
        assert_eq!(detection.language, "kk");
    }

    #[tokio::test]
    async fn test_ip_unknown_currency_uses_base() {
        let location = IpLocation {
            country_name: Some("Brazil".to_string()),
            country_code: Some("BR".to_string()),
            currency: Some("BRL".to_string()),
            ..IpLocation::default()
        };
        let detector = RegionDetector::new(FixedLookup(location), env(None, Some("pt-BR")));
        let detection = detector.detect().await;

        assert_eq!(detection.source, DetectionSource::Ip);
        assert_eq!(detection.currency, BASE_CURRENCY);
        assert_eq!(detection.language, "pt");
    }

    #[tokio::test]
    async fn test_malformed_ip_response_falls_back_to_timezone() {
        let location = IpLocation {
            error: Some(true),
            reason: Some("RateLimited".to_string()),
            ..IpLocation::default()
        };
        let detector = RegionDetector::new(FixedLookup(location), env(Some("Europe/London"), None));
        let detection = detector.detect().await;

        assert_eq!(detection.source, DetectionSource::Timezone);
        assert_eq!(detection.currency, CurrencyCode::GBP);
        assert_eq!(detection.country_code.as_deref(), Some("GB"));
    }

    #[tokio::test]
    async fn test_network_error_unknown_timezone_falls_back() {
        let detector = RegionDetector::new(FailingLookup, env(Some("Pacific/Nauru"), Some("de-AT")));
        let detection = detector.detect().await;

        assert_eq!(detection.source, DetectionSource::Fallback);
        assert_eq!(detection.country, UNKNOWN_COUNTRY);
        assert_eq!(detection.language, "de");
        assert_eq!(detection.currency, BASE_CURRENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_without_error() {
        let detector = RegionDetector::new(HangingLookup, env(None, Some("fr-CA")))
            .with_timeout(Duration::from_millis(50));
        let detection = detector.detect().await;

        assert_eq!(detection.source, DetectionSource::Fallback);
        assert_eq!(detection.language, "fr");
        assert_eq!(detection.currency, BASE_CURRENCY);
    }

    #[tokio::test]
    async fn test_no_lookup_uses_timezone() {
        let detector = RegionDetector::new(NoLookup, env(Some("Europe/Moscow"), None));
        let detection = detector.detect().await;
        assert_eq!(detection.source, DetectionSource::Timezone);
        assert_eq!(detection.currency, CurrencyCode::RUB);
        assert_eq!(detection.language, "ru");
    }

    #[test]
    fn test_locale_language() {
        assert_eq!(locale_language(Some("ru-RU")), "ru");
        assert_eq!(locale_language(Some("en_US.UTF-8")), "en");
        assert_eq!(locale_language(Some("C")), "en");
        assert_eq!(locale_language(Some("POSIX")), "en");
        assert_eq!(locale_language(None), "en");
    }

    #[test]
    fn test_ip_location_parses_service_json() {
        let json = r#"{"ip":"1.2.3.4","country_name":"Japan","country_code":"JP","currency":"JPY","languages":"ja","timezone":"Asia/Tokyo"}"#;
        let location: IpLocation = serde_json::from_str(json).unwrap();
        let detection = from_ip(&location, &ClientEnvironment::default()).unwrap();
        assert_eq!(detection.currency, CurrencyCode::JPY);
        assert_eq!(detection.timezone.as_deref(), Some("Asia/Tokyo"));
    }
}
