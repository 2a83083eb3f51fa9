//! Money
//!
//! Prices are exact integer minor units (euro cents). Catalog fixtures
//! write them as `"6,50 EUR"` strings; parsing and display formatting go
//! through `rusty-money`.

use rusty_money::{Money, iso};
use thiserror::Error;

/// The currency every bundled price is denominated in.
pub const CURRENCY: &iso::Currency = iso::EUR;

/// Money parsing errors.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// The price string is not `"<amount> <code>"`.
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// The currency code is not a known ISO code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The price is denominated in a currency other than EUR.
    #[error("expected an EUR price, found {0}")]
    WrongCurrency(String),
}

/// Parse a fixture price such as `"6,50 EUR"` into minor units.
///
/// # Errors
///
/// Returns an error when the string is malformed, the currency code is
/// unknown, the currency is not EUR, or the amount is negative.
pub fn parse_price(price: &str) -> Result<u64, MoneyError> {
    let (amount, code) = price
        .trim()
        .rsplit_once(' ')
        .ok_or_else(|| MoneyError::InvalidPrice(price.to_string()))?;

    let currency =
        iso::find(code.trim()).ok_or_else(|| MoneyError::UnknownCurrency(code.to_string()))?;

    if currency != CURRENCY {
        return Err(MoneyError::WrongCurrency(
            currency.iso_alpha_code.to_string(),
        ));
    }

    let money = Money::from_str(amount.trim(), currency)
        .map_err(|_error| MoneyError::InvalidPrice(price.to_string()))?;

    u64::try_from(money.to_minor_units())
        .map_err(|_error| MoneyError::InvalidPrice(price.to_string()))
}

/// Render minor units as a display amount, e.g. `650` -> `€6,50`.
#[must_use]
pub fn format_minor(minor: u64) -> String {
    let minor = i64::try_from(minor).unwrap_or(i64::MAX);

    Money::from_minor(minor, CURRENCY).to_string()
}
