//! Place Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use settle::payments::PaymentMode;
use uuid::Uuid;

use settle_app::domain::{
    checkout::{data::PlaceOrder, records::PlacedOrder},
    payments::records::GatewayCheckout,
};

use crate::{
    checkout::errors::into_status_error,
    extensions::*,
    observability::record_checkout,
    orders::models::OrderResponse,
    state::State,
};

/// Payment instrument chosen at checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PaymentModeRequest {
    /// Cash on delivery
    Cod,

    /// Debit the wallet balance
    Wallet,

    /// Pay through the payment gateway
    Gateway,
}

impl From<PaymentModeRequest> for PaymentMode {
    fn from(mode: PaymentModeRequest) -> Self {
        match mode {
            PaymentModeRequest::Cod => Self::Cod,
            PaymentModeRequest::Wallet => Self::Wallet,
            PaymentModeRequest::Gateway => Self::Gateway,
        }
    }
}

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub address_uuid: Uuid,
    pub payment_mode: PaymentModeRequest,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(request: PlaceOrderRequest) -> Self {
        PlaceOrder {
            address: request.address_uuid.into(),
            payment_mode: request.payment_mode.into(),
        }
    }
}

/// Where the browser completes a gateway payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GatewayCheckoutResponse {
    pub gateway_order_id: String,

    /// In paise
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
}

impl From<GatewayCheckout> for GatewayCheckoutResponse {
    fn from(checkout: GatewayCheckout) -> Self {
        Self {
            gateway_order_id: checkout.gateway_order_id,
            amount: checkout.amount,
            currency: checkout.currency,
            key_id: checkout.key_id,
        }
    }
}

/// Place Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlacedOrderResponse {
    pub order: OrderResponse,

    /// Present for gateway checkouts until the callback settles the payment
    pub gateway: Option<GatewayCheckoutResponse>,
}

impl From<PlacedOrder> for PlacedOrderResponse {
    fn from(placed: PlacedOrder) -> Self {
        Self {
            order: placed.summary.into(),
            gateway: placed.gateway.map(Into::into),
        }
    }
}

/// Place Order Handler
///
/// Turns the caller's cart into an order. COD and wallet orders commit stock immediately;
/// gateway orders return the gateway order to pay against.
#[endpoint(
    tags("checkout"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or address not found"),
        (status_code = StatusCode::CONFLICT, description = "Stock, wallet balance or coupon no longer sufficient"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PlacedOrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request: PlaceOrder = json.into_inner().into();

    let placed = state
        .app
        .checkout
        .place_order(user, request)
        .await
        .map_err(into_status_error)?;

    record_checkout(request.payment_mode);

    res.created_at(format!("/orders/{}", placed.summary.order.uuid))?;

    Ok(Json(placed.into()))
}
