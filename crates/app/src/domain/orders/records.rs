//! Order Records

use std::num::TryFromIntError;

use jiff::Timestamp;
use settle::{
    orders::{OrderItemStatus, OrderStatus},
    payments::PaymentMode,
    refunds::PaymentBreakdown,
};

use crate::{
    amounts,
    domain::{payments::records::PaymentRecord, products::records::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Shipping address copied onto an order when it is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub total_amount: u64,
    pub payment_mode: PaymentMode,
    pub status: OrderStatus,
    pub shipping: ShippingAddress,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: u64,
    pub total_price: u64,
    pub status: OrderItemStatus,
    pub return_reason: Option<String>,
    pub returned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Payment Detail Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPaymentDetailRecord {
    pub order_uuid: OrderUuid,
    pub order_amount: u64,
    pub order_discount: u64,
    pub coupon_code: Option<String>,
    pub coupon_savings: u64,
    pub final_order_amount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderPaymentDetailRecord {
    /// The stored figures as a refund breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored amount does not fit the settlement core.
    pub fn breakdown(&self) -> Result<PaymentBreakdown<'static>, TryFromIntError> {
        Ok(PaymentBreakdown {
            order_amount: amounts::to_money(self.order_amount)?,
            order_discount: amounts::to_money(self.order_discount)?,
            coupon_savings: amounts::to_money(self.coupon_savings)?,
            final_order_amount: amounts::to_money(self.final_order_amount)?,
        })
    }
}

/// An order with everything a customer sees about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub order: OrderRecord,
    pub items: Vec<OrderItemRecord>,
    pub payment_detail: OrderPaymentDetailRecord,
    pub payment: PaymentRecord,
}

/// Outcome of a cancellation or return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReversal {
    pub summary: OrderSummary,

    /// Credited to the customer's wallet
    pub refunded: u64,

    /// Units put back into stock
    pub restocked: u32,
}
