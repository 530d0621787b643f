//! Return Order Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{ReversalKind, record_reversal},
    orders::{errors::into_status_error, models::ReversalResponse},
    state::State,
};

/// Return Order Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReturnItemRequest {
    pub reason: String,
}

/// Return Order Item Handler
#[endpoint(
    tags("orders"),
    summary = "Return Order Item",
    responses(
        (status_code = StatusCode::OK, description = "Item returned"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing return reason"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or item not found"),
        (status_code = StatusCode::CONFLICT, description = "Gateway payment not settled yet"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Return window closed or item not pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    json: JsonBody<ReturnItemRequest>,
    depot: &mut Depot,
) -> Result<Json<ReversalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let reversal = state
        .app
        .orders
        .return_item(
            user,
            order.into_inner().into(),
            item.into_inner().into(),
            json.into_inner().reason,
        )
        .await
        .map_err(into_status_error)?;

    record_reversal(ReversalKind::ItemReturned);

    Ok(Json(reversal.into()))
}
