//! Cart Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use settle_app::domain::carts::records::{CartItemRecord, CartSummary};

/// One cart line, priced at current product prices.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub quantity: u32,

    /// Unit price before any offer, in paise
    pub price: u64,

    /// Unit price after the product's offer, in paise
    pub discounted_price: u64,

    /// Discounted unit price times quantity, in paise
    pub total_price: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
            discounted_price: item.discounted_price,
            total_price: item.total_price,
        }
    }
}

/// The cart's pricing snapshot. Amounts are in paise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub uuid: Uuid,
    pub items: Vec<CartItemResponse>,
    pub coupon_code: Option<String>,
    pub subtotal: u64,
    pub product_discount: u64,
    pub coupon_discount: u64,
    pub payable: u64,

    /// The coupon was removed because the cart fell below its minimum purchase
    pub coupon_detached: bool,
}

impl From<CartSummary> for CartResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            uuid: summary.cart.uuid.into(),
            items: summary.items.into_iter().map(Into::into).collect(),
            coupon_code: summary.coupon_code,
            subtotal: summary.subtotal,
            product_discount: summary.product_discount,
            coupon_discount: summary.coupon_discount,
            payable: summary.payable,
            coupon_detached: summary.coupon_detached,
        }
    }
}
