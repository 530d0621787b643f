//! List Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// List Orders Handler
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "The caller's orders, newest first"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use settle_app::domain::orders::{
        MockOrdersService,
        records::{OrderItemUuid, OrderUuid},
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order_summary, strict_app, user_service};

    use super::*;

    #[tokio::test]
    async fn list_orders_returns_summaries() -> TestResult {
        let first = OrderUuid::new();
        let second = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| {
                Ok(vec![
                    make_order_summary(second, OrderItemUuid::new()),
                    make_order_summary(first, OrderItemUuid::new()),
                ])
            });

        let mut app = strict_app();
        app.orders = Arc::new(orders);

        let mut res = TestClient::get("http://example.com/orders")
            .send(&user_service(app, Router::with_path("orders").get(handler)))
            .await;

        let body: Vec<OrderResponse> = res.take_json().await?;
        let uuids: Vec<_> = body.iter().map(|order| order.uuid).collect();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(uuids, vec![second.into_uuid(), first.into_uuid()]);

        Ok(())
    }
}
