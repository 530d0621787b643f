//! Payment Records

use jiff::Timestamp;
use settle::payments::{PaymentMode, PaymentStatus};

use crate::{
    domain::{orders::records::OrderUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Payment Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub payment_mode: PaymentMode,
    pub amount: u64,
    pub status: PaymentStatus,

    /// Order id issued by the gateway, for gateway payments
    pub gateway_order_id: Option<String>,

    /// Payment id reported by a verified callback
    pub gateway_payment_id: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Where a shopper's browser takes a gateway payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCheckout {
    pub gateway_order_id: String,
    pub amount: u64,
    pub currency: String,

    /// Public key the browser widget is opened with
    pub key_id: String,
}

/// Result of applying a gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The payment moved to paid and the order's stock was committed.
    Applied(PaymentRecord),

    /// The payment was already paid; nothing changed.
    Duplicate(PaymentRecord),
}

impl CallbackOutcome {
    pub fn payment(&self) -> &PaymentRecord {
        match self {
            Self::Applied(payment) | Self::Duplicate(payment) => payment,
        }
    }
}
