//! Checkout Data

use settle::payments::PaymentMode;

use crate::domain::addresses::records::AddressUuid;

/// Checkout request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOrder {
    /// Address snapshotted onto the order
    pub address: AddressUuid,

    pub payment_mode: PaymentMode,
}
