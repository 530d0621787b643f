//! Coupon Data

use decimal_percentage::Percentage;
use jiff::Timestamp;

use crate::domain::coupons::records::CouponUuid;

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount: Percentage,
    pub min_purchase_amount: u64,
    pub max_discount_amount: u64,
    pub max_usage: u32,
    pub expires_at: Timestamp,
}
