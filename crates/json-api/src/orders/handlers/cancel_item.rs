//! Cancel Order Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{ReversalKind, record_reversal},
    orders::{errors::into_status_error, models::ReversalResponse},
    state::State,
};

/// Cancel Order Item Handler
///
/// Refunds the item's share of the order, net of its share of any coupon.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order Item",
    responses(
        (status_code = StatusCode::OK, description = "Item canceled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or item not found"),
        (status_code = StatusCode::CONFLICT, description = "Gateway payment not settled yet"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Item is no longer pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReversalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let reversal = state
        .app
        .orders
        .cancel_item(user, order.into_inner().into(), item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    record_reversal(ReversalKind::ItemCanceled);

    Ok(Json(reversal.into()))
}
