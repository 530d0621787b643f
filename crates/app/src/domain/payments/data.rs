//! Payment Data

use settle::payments::{PaymentMode, PaymentStatus};

use crate::domain::{
    orders::records::OrderUuid,
    payments::records::PaymentUuid,
    users::UserUuid,
};

/// New Payment Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub payment_mode: PaymentMode,
    pub amount: u64,
    pub status: PaymentStatus,
    pub gateway_order_id: Option<String>,
}

/// A gateway callback, as posted back by the shopper's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}
