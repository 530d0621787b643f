//! Apply Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Apply Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponRequest {
    pub code: String,
}

/// Apply Coupon Handler
#[endpoint(
    tags("cart"),
    summary = "Apply Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon applied"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing coupon code"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown coupon"),
        (status_code = StatusCode::CONFLICT, description = "Coupon expired, exhausted or below its minimum"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_inner();
    let code = request.code.trim();

    if code.is_empty() {
        return Err(StatusError::bad_request().brief("Coupon code is required"));
    }

    let cart = state
        .app
        .carts
        .apply_coupon(user, code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
