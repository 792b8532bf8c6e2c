//! Price conversion and locale-aware rendering.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::table::{BASE_CURRENCY, Currency, CurrencyCode, SymbolPosition};

/// Rendering switches for [`PriceFormatter::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Render the currency symbol.
    pub show_symbol: bool,
    /// Append the ISO code, e.g. `"12.00 USD"`.
    pub show_code: bool,
    /// Override the currency's default precision.
    pub precision: Option<u32>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            show_symbol: true,
            show_code: false,
            precision: None,
        }
    }
}

impl FormatOptions {
    /// Number only: no symbol, no code.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            show_symbol: false,
            show_code: false,
            precision: None,
        }
    }

    /// Symbol plus trailing ISO code.
    #[must_use]
    pub const fn with_code() -> Self {
        Self {
            show_symbol: true,
            show_code: true,
            precision: None,
        }
    }
}

/// Result of comparing an original price with a discounted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Savings {
    /// `original - current`, in the base currency.
    pub amount: Decimal,
    /// Whole-number percentage of `original` saved.
    pub percentage: i64,
    /// `amount` formatted in the display currency.
    pub formatted: String,
}

/// Converts base-currency prices into one display currency and renders them.
///
/// The display currency is fixed at construction; switching currency means
/// building a new formatter, so no formatting call depends on ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFormatter {
    currency: CurrencyCode,
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::new(BASE_CURRENCY)
    }
}

impl PriceFormatter {
    /// Create a formatter for the given display currency.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }

    /// The display currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Convert `amount` from `from` into the display currency.
    #[must_use]
    pub fn convert(&self, amount: Decimal, from: CurrencyCode) -> Decimal {
        convert_between(amount, from, self.currency)
    }

    /// Convert a base-currency amount into the display currency.
    #[must_use]
    pub fn convert_from_base(&self, amount: Decimal) -> Decimal {
        self.convert(amount, BASE_CURRENCY)
    }

    /// Convert a base-currency amount and render it in the display currency.
    #[must_use]
    pub fn format(&self, amount: Decimal, options: &FormatOptions) -> String {
        render(self.convert_from_base(amount), self.currency.info(), options)
    }

    /// Treat `amount` as being in the display currency and render it in `target`.
    ///
    /// Used for side-by-side comparisons ("≈ $12.00").
    #[must_use]
    pub fn format_as(&self, amount: Decimal, target: CurrencyCode, options: &FormatOptions) -> String {
        render(
            convert_between(amount, self.currency, target),
            target.info(),
            options,
        )
    }

    /// Compare an original base-currency price with a discounted one.
    ///
    /// An `original` of zero yields zero savings rather than a division error.
    #[must_use]
    pub fn calculate_savings(&self, original: Decimal, current: Decimal) -> Savings {
        if original.is_zero() {
            return Savings {
                amount: Decimal::ZERO,
                percentage: 0,
                formatted: self.format(Decimal::ZERO, &FormatOptions::default()),
            };
        }

        let amount = original - current;
        let percentage = (amount * Decimal::ONE_HUNDRED / original)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0);

        Savings {
            amount,
            percentage,
            formatted: self.format(amount, &FormatOptions::default()),
        }
    }
}

/// Convert through the common unit: `amount / from.rate * to.rate`.
///
/// Saturates at [`Decimal::MAX`] instead of overflowing.
#[must_use]
pub fn convert_between(amount: Decimal, from: CurrencyCode, to: CurrencyCode) -> Decimal {
    if from == to {
        return amount;
    }

    amount
        .checked_div(from.info().exchange_rate)
        .and_then(|common| common.checked_mul(to.info().exchange_rate))
        .unwrap_or(if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Render an amount already expressed in `currency`.
pub(crate) fn render(amount: Decimal, currency: &Currency, options: &FormatOptions) -> String {
    let precision = options.precision.unwrap_or(currency.precision);
    let rounded = amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut magnitude = rounded.abs();
    magnitude.rescale(precision);
    let digits = magnitude.to_string();

    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let mut number = group_digits(integer, currency.group_separator);
    if !fraction.is_empty() {
        number.push_str(currency.decimal_separator);
        number.push_str(fraction);
    }

    let mut out = String::with_capacity(number.len() + 8);
    if negative {
        out.push('-');
    }

    let gap = if currency.symbol_spaced { " " } else { "" };
    match (options.show_symbol, currency.symbol_position) {
        (true, SymbolPosition::Prefix) => {
            out.push_str(currency.symbol);
            out.push_str(gap);
            out.push_str(&number);
        }
        (true, SymbolPosition::Suffix) => {
            out.push_str(&number);
            out.push_str(gap);
            out.push_str(currency.symbol);
        }
        (false, _) => out.push_str(&number),
    }

    if options.show_code {
        out.push(' ');
        out.push_str(currency.code.as_str());
    }

    out
}

/// Insert `separator` between each group of three digits, counting from the right.
fn group_digits(integer: &str, separator: &str) -> String {
    let len = integer.chars().count();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
