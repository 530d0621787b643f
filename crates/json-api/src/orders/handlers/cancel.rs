//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{ReversalKind, record_reversal},
    orders::{errors::into_status_error, models::ReversalResponse},
    state::State,
};

/// Cancel Order Handler
///
/// Cancels every pending item, restocks what was committed and credits a paid order's remaining
/// total to the wallet.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    responses(
        (status_code = StatusCode::OK, description = "Order canceled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Order is no longer pending"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReversalResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let reversal = state
        .app
        .orders
        .cancel_order(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    record_reversal(ReversalKind::OrderCanceled);

    Ok(Json(reversal.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use settle::orders::{OrderStatus, StatusError as TransitionError};
    use testresult::TestResult;

    use settle_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::{OrderItemUuid, OrderReversal, OrderUuid},
    };

    use crate::test_helpers::{TEST_USER_UUID, make_order_summary, strict_app, user_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = strict_app();
        app.orders = Arc::new(orders);

        user_service(app, Router::with_path("orders/{order}/cancel").post(handler))
    }

    #[tokio::test]
    async fn cancel_order_reports_refund_and_restock() -> TestResult {
        let order = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == order)
            .return_once(move |_, _| {
                let mut summary = make_order_summary(order, OrderItemUuid::new());
                summary.order.status = OrderStatus::Canceled;

                Ok(OrderReversal {
                    summary,
                    refunded: 185_00,
                    restocked: 2,
                })
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{order}/cancel"))
            .send(&make_service(orders))
            .await;

        let body: ReversalResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.order.status, "canceled");
        assert_eq!(body.refunded, 185_00);
        assert_eq!(body.restocked, 2);

        Ok(())
    }

    #[tokio::test]
    async fn canceling_a_resolved_order_returns_422() {
        let mut orders = MockOrdersService::new();

        orders.expect_cancel_order().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidTransition(
                TransitionError::InvalidTransition {
                    from: "canceled",
                    to: "canceled",
                },
            ))
        });

        let res = TestClient::post(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
