//! Display preferences: currency, language and country.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::persist::{Persisted, Storage, StoreKey};
use crate::currency::{BASE_CURRENCY, CurrencyCode, PriceFormatter, RegionalFormatter};
use crate::region::{DEFAULT_LANGUAGE, Detection};

pub const PREFERENCES_KEY: StoreKey = StoreKey::new("preferences", 1);

/// Persisted display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesState {
    pub currency: CurrencyCode,
    pub language: String,
    pub country_code: Option<String>,
    /// The shopper picked currency or language explicitly; detection no
    /// longer overrides it.
    pub user_selected: bool,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            currency: BASE_CURRENCY,
            language: DEFAULT_LANGUAGE.to_string(),
            country_code: None,
            user_selected: false,
        }
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    inner: Persisted<PreferencesState>,
}

impl PreferencesStore {
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        Self {
            inner: Persisted::open(storage, PREFERENCES_KEY),
        }
    }

    #[must_use]
    pub fn state(&self) -> &PreferencesState {
        self.inner.state()
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.state().currency
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.inner.state().language
    }

    /// Seed defaults from a detection unless the shopper already chose.
    /// Returns whether anything was applied.
    pub fn apply_detection(&mut self, detection: &Detection) -> bool {
        if self.inner.state().user_selected {
            tracing::debug!("Keeping explicit preferences over detected region");
            return false;
        }

        self.inner.mutate(|prefs| {
            prefs.currency = detection.currency;
            prefs.language.clone_from(&detection.language);
            prefs.country_code.clone_from(&detection.country_code);
        });
        true
    }

    /// Explicitly choose a display currency.
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.inner.mutate(|prefs| {
            prefs.currency = currency;
            prefs.user_selected = true;
        });
    }

    /// Explicitly choose a language (primary subtag, e.g. `"ru"`).
    pub fn set_language(&mut self, language: &str) {
        let language = language.trim().to_ascii_lowercase();
        self.inner.mutate(|prefs| {
            prefs.language = language;
            prefs.user_selected = true;
        });
    }

    /// Formatter for the current currency.
    #[must_use]
    pub fn price_formatter(&self) -> PriceFormatter {
        PriceFormatter::new(self.currency())
    }

    /// Regional formatter for the current currency, country and language.
    #[must_use]
    pub fn regional_formatter(&self) -> RegionalFormatter {
        let state = self.inner.state();
        RegionalFormatter::new(
            state.currency,
            state.country_code.as_deref().unwrap_or_default(),
            &state.language,
        )
    }
}
