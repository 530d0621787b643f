//! Order Data

use settle::payments::PaymentMode;

use crate::domain::{
    orders::records::{OrderItemUuid, OrderUuid, ShippingAddress},
    products::records::ProductUuid,
    users::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub total_amount: u64,
    pub payment_mode: PaymentMode,
    pub shipping: ShippingAddress,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: u64,
    pub total_price: u64,
}

/// New Order Payment Detail Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentDetail {
    pub order_amount: u64,
    pub order_discount: u64,
    pub coupon_code: Option<String>,
    pub coupon_savings: u64,
    pub final_order_amount: u64,
}
