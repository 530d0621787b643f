//! Get Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::models::PaymentResponse,
    payments::errors::into_status_error,
    state::State,
};

/// Get Payment Handler
#[endpoint(
    tags("payments"),
    summary = "Get Order Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let payment = state
        .app
        .payments
        .get_payment(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(payment.into()))
}
