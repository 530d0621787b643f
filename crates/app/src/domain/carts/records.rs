//! Cart Records

use decimal_percentage::Percentage;
use jiff::Timestamp;

use crate::{
    domain::{coupons::records::CouponUuid, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub cart_total: u64,
    pub coupon_uuid: Option<CouponUuid>,
    pub coupon_discount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record, with the product's current price, offer and stock.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub price: u64,
    pub discounted_price: u64,
    pub discount_percentage: Option<Percentage>,
    pub total_price: u64,
    pub product_price: u64,
    pub product_offer: Option<Percentage>,
    pub product_stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart with its freshly computed Pricing Snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub cart: CartRecord,
    pub items: Vec<CartItemRecord>,
    pub coupon_code: Option<String>,
    pub subtotal: u64,
    pub product_discount: u64,
    pub coupon_discount: u64,
    pub payable: u64,
    pub coupon_detached: bool,
}
