//! Coupon Records

use std::num::TryFromIntError;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use settle::{
    coupons::{self, CouponUnavailable},
    pricing::CouponTerms,
};

use crate::{amounts, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: Percentage,
    pub min_purchase_amount: u64,
    pub max_discount_amount: u64,
    pub max_usage: u32,
    pub usage_count: u32,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CouponRecord {
    /// Pricing terms for this coupon.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored amount does not fit the pricing core.
    pub fn terms(&self) -> Result<CouponTerms<'static>, TryFromIntError> {
        Ok(CouponTerms {
            discount: self.discount,
            min_purchase: amounts::to_money(self.min_purchase_amount)?,
            max_discount: amounts::to_money(self.max_discount_amount)?,
        })
    }

    /// Whether the coupon can still be used at `now`.
    ///
    /// # Errors
    ///
    /// Returns why the coupon is unavailable.
    pub fn check_available(&self, now: Timestamp) -> Result<(), CouponUnavailable> {
        coupons::check_availability(self.expires_at, self.usage_count, self.max_usage, now)
    }
}
