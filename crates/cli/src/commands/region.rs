//! Region detection and preference commands.

use teahouse_client::Session;
use teahouse_core::currency::CurrencyCode;

pub async fn detect(session: &mut Session) {
    let detection = session.detect_region().await;
    tracing::info!(
        "{} ({}) - currency {}, language {} [via {:?}]",
        detection.country,
        detection.country_code.as_deref().unwrap_or("??"),
        detection.currency,
        detection.language,
        detection.source
    );
    if session.shop.preferences().state().user_selected {
        tracing::info!(
            "Keeping your chosen currency {}",
            session.shop.preferences().currency()
        );
    }
}

pub fn set_currency(session: &mut Session, code: CurrencyCode) {
    session.shop.set_currency(code);
    tracing::info!("Prices will be shown in {}", code.info().name);
}

pub fn set_language(session: &mut Session, language: &str) {
    session.shop.set_language(language);
    tracing::info!("Language set to {}", session.shop.preferences().language());
}

pub fn show_preferences(session: &Session) {
    let prefs = session.shop.preferences().state();
    tracing::info!(
        "currency {}, language {}, country {}{}",
        prefs.currency,
        prefs.language,
        prefs.country_code.as_deref().unwrap_or("unknown"),
        if prefs.user_selected { " (chosen)" } else { " (detected)" }
    );
}
