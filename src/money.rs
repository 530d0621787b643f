//! Money

use rusty_money::{Money, iso::Currency};

/// Settlement currency. Every stored amount is in this currency's minor unit (paise).
pub const CURRENCY: &Currency = rusty_money::iso::INR;

/// ISO code the gateway is told amounts are in.
pub const CURRENCY_CODE: &str = "INR";

/// Lift a minor-unit amount into [`Money`] in the settlement currency.
#[must_use]
pub fn inr(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, CURRENCY)
}

/// The lesser of two amounts.
#[must_use]
pub fn min<'a>(a: Money<'a, Currency>, b: Money<'a, Currency>) -> Money<'a, Currency> {
    if a.to_minor_units() <= b.to_minor_units() {
        a
    } else {
        b
    }
}

/// Subtract `b` from `a`, flooring the result at zero.
#[must_use]
pub fn saturating_sub<'a>(a: Money<'a, Currency>, b: Money<'a, Currency>) -> Money<'a, Currency> {
    let minor = a.to_minor_units().saturating_sub(b.to_minor_units()).max(0);

    Money::from_minor(minor, a.currency())
}
