//! Complete Order Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Complete Order Item Handler
///
/// Records delivery of one item. The order completes once no item is left pending.
#[endpoint(
    tags("orders"),
    summary = "Complete Order Item",
    responses(
        (status_code = StatusCode::OK, description = "Item completed"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or item not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Item is no longer pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let summary = state
        .app
        .orders
        .complete_item(user, order.into_inner().into(), item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use settle::orders::{OrderItemStatus, OrderStatus};
    use testresult::TestResult;

    use settle_app::domain::orders::{
        MockOrdersService,
        records::{OrderItemUuid, OrderUuid},
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order_summary, strict_app, user_service};

    use super::*;

    #[tokio::test]
    async fn completing_the_last_item_completes_the_order() -> TestResult {
        let order = OrderUuid::new();
        let item = OrderItemUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_complete_item()
            .once()
            .withf(move |user, o, i| *user == TEST_USER_UUID && *o == order && *i == item)
            .return_once(move |_, _, _| {
                let mut summary = make_order_summary(order, item);
                summary.order.status = OrderStatus::Completed;

                for line in &mut summary.items {
                    line.status = OrderItemStatus::Completed;
                }

                Ok(summary)
            });

        let mut app = strict_app();
        app.orders = Arc::new(orders);

        let mut res = TestClient::post(format!(
            "http://example.com/orders/{order}/items/{item}/complete"
        ))
        .send(&user_service(
            app,
            Router::with_path("orders/{order}/items/{item}/complete").post(handler),
        ))
        .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "completed");

        Ok(())
    }
}
