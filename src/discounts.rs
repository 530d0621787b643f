//! Discount utilities
//!
//! Percentage and ratio helpers shared by cart pricing and refunds. All results are whole minor
//! units, rounded half-to-even.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Ratio calculation overflowed.
    #[error("ratio calculation overflowed")]
    RatioOverflow,
}

/// Extract the fractional value of a percentage (`0.25` for 25%).
pub fn fraction(percent: &Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    (*percent) * Decimal::ONE
}

/// Whether the percentage takes anything off at all.
pub fn is_positive(percent: &Percentage) -> bool {
    fraction(percent) > Decimal::ZERO
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    fraction(percent)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Price left after taking `percent` off `minor`, i.e. `minor × (1 − percent)`.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn minor_after_percent_off(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    Decimal::ONE
        .checked_sub(fraction(percent))
        .and_then(|remaining| remaining.checked_mul(minor))
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate `minor × numerator / denominator` in decimal space.
///
/// A zero denominator yields zero.
///
/// # Errors
///
/// Returns [`DiscountError::RatioOverflow`] if the calculation overflows.
pub fn ratio_of_minor(minor: i64, numerator: i64, denominator: i64) -> Result<i64, DiscountError> {
    if denominator == 0 {
        return Ok(0);
    }

    let minor = Decimal::from(minor);
    let numerator = Decimal::from(numerator);
    let denominator = Decimal::from(denominator);

    minor
        .checked_mul(numerator)
        .and_then(|product| product.checked_div(denominator))
        .ok_or(DiscountError::RatioOverflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(DiscountError::RatioOverflow)
}
