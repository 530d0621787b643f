//! Order Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use settle_app::domain::{
    orders::records::{
        OrderItemRecord, OrderPaymentDetailRecord, OrderReversal, OrderSummary, ShippingAddress,
    },
    payments::records::PaymentRecord,
};

/// Shipping address as it was when the order was placed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressResponse {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

impl From<ShippingAddress> for ShippingAddressResponse {
    fn from(address: ShippingAddress) -> Self {
        Self {
            street: address.street,
            city: address.city,
            state: address.state,
            country: address.country,
            zip: address.zip,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub quantity: u32,

    /// Unit price paid, in paise
    pub price: u64,
    pub total_price: u64,
    pub status: String,
    pub return_reason: Option<String>,
    pub returned_at: Option<String>,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            price: item.price,
            total_price: item.total_price,
            status: item.status.to_string(),
            return_reason: item.return_reason,
            returned_at: item.returned_at.map(|at| at.to_string()),
        }
    }
}

/// How the order total was reached. Reversals reduce these figures as items are refunded.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentDetailResponse {
    pub order_amount: u64,
    pub order_discount: u64,
    pub coupon_code: Option<String>,
    pub coupon_savings: u64,
    pub final_order_amount: u64,
}

impl From<OrderPaymentDetailRecord> for PaymentDetailResponse {
    fn from(detail: OrderPaymentDetailRecord) -> Self {
        Self {
            order_amount: detail.order_amount,
            order_discount: detail.order_discount,
            coupon_code: detail.coupon_code,
            coupon_savings: detail.coupon_savings,
            final_order_amount: detail.final_order_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub uuid: Uuid,
    pub payment_mode: String,
    pub status: String,
    pub amount: u64,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub updated_at: String,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            uuid: payment.uuid.into(),
            payment_mode: payment.payment_mode.to_string(),
            status: payment.status.to_string(),
            amount: payment.amount,
            gateway_order_id: payment.gateway_order_id,
            gateway_payment_id: payment.gateway_payment_id,
            updated_at: payment.updated_at.to_string(),
        }
    }
}

/// An order with its items, breakdown and payment status. Amounts are in paise.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub status: String,
    pub payment_mode: String,
    pub total_amount: u64,
    pub shipping: ShippingAddressResponse,
    pub items: Vec<OrderItemResponse>,
    pub payment_detail: PaymentDetailResponse,
    pub payment: PaymentResponse,
    pub created_at: String,
}

impl From<OrderSummary> for OrderResponse {
    fn from(summary: OrderSummary) -> Self {
        let OrderSummary {
            order,
            items,
            payment_detail,
            payment,
        } = summary;

        Self {
            uuid: order.uuid.into(),
            status: order.status.to_string(),
            payment_mode: order.payment_mode.to_string(),
            total_amount: order.total_amount,
            shipping: order.shipping.into(),
            items: items.into_iter().map(Into::into).collect(),
            payment_detail: payment_detail.into(),
            payment: payment.into(),
            created_at: order.created_at.to_string(),
        }
    }
}

/// A cancellation or return, with what it gave back.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReversalResponse {
    pub order: OrderResponse,

    /// Credited to the wallet, in paise
    pub refunded: u64,

    /// Units returned to stock
    pub restocked: u32,
}

impl From<OrderReversal> for ReversalResponse {
    fn from(reversal: OrderReversal) -> Self {
        Self {
            order: reversal.summary.into(),
            refunded: reversal.refunded,
            restocked: reversal.restocked,
        }
    }
}
