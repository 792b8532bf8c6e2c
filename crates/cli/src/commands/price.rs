//! Price conversion and formatting commands.

use rust_decimal::Decimal;
use teahouse_client::Session;
use teahouse_core::currency::{CurrencyCode, FormatOptions, PriceFormatter, RegionalFormatter};

pub fn convert(amount: Decimal, from: CurrencyCode, to: CurrencyCode) {
    let source = PriceFormatter::new(from);
    tracing::info!(
        "{} = {}",
        source.format_as(amount, from, &FormatOptions::with_code()),
        source.format_as(amount, to, &FormatOptions::with_code())
    );
}

/// Formatter for an explicit currency, or the saved preferences.
fn regional(session: &Session, currency: Option<CurrencyCode>) -> RegionalFormatter {
    let prefs = session.shop.preferences().state();
    RegionalFormatter::new(
        currency.unwrap_or(prefs.currency),
        prefs.country_code.as_deref().unwrap_or_default(),
        &prefs.language,
    )
}

pub fn format(
    session: &Session,
    amount: Decimal,
    currency: Option<CurrencyCode>,
    code: bool,
    no_symbol: bool,
) {
    let regional = regional(session, currency);
    let options = FormatOptions {
        show_symbol: !no_symbol,
        show_code: code,
        precision: regional.suppresses_decimals().then_some(0),
    };
    tracing::info!("{}", regional.formatter().format(amount, &options));
    tracing::info!("{}", regional.tax_label());
}

pub fn range(session: &Session, min: Decimal, max: Decimal) {
    tracing::info!("{}", regional(session, None).format_range(min, max));
}

pub fn savings(session: &Session, original: Decimal, current: Decimal, currency: Option<CurrencyCode>) {
    let savings = regional(session, currency)
        .formatter()
        .calculate_savings(original, current);
    tracing::info!("You save {} ({}%)", savings.formatted, savings.percentage);
}

pub fn currencies() {
    for code in CurrencyCode::ALL {
        let info = code.info();
        tracing::info!(
            "{} {:<3} {:<20} rate {}",
            info.symbol,
            code,
            info.name,
            info.exchange_rate
        );
    }
}
