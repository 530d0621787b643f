//! Retry Payment Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    checkout::place::GatewayCheckoutResponse,
    extensions::*,
    payments::errors::into_status_error,
    state::State,
};

/// Retry Payment Handler
///
/// Issues a fresh gateway order for a gateway payment that is still pending.
#[endpoint(
    tags("payments"),
    summary = "Retry Payment",
    responses(
        (status_code = StatusCode::OK, description = "Fresh gateway order issued"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Payment is paid or not a gateway payment"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<GatewayCheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let checkout = state
        .app
        .payments
        .retry_payment(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(checkout.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use settle_app::{
        domain::{
            orders::records::OrderUuid,
            payments::{MockPaymentsService, PaymentsServiceError, records::GatewayCheckout},
        },
        gateway::GatewayError,
    };

    use crate::test_helpers::{TEST_USER_UUID, strict_app, user_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        let mut app = strict_app();
        app.payments = Arc::new(payments);

        user_service(
            app,
            Router::with_path("orders/{order}/payment/retry").post(handler),
        )
    }

    fn retry_url(order: OrderUuid) -> String {
        format!("http://example.com/orders/{order}/payment/retry")
    }

    #[tokio::test]
    async fn retry_returns_fresh_gateway_order() -> TestResult {
        let order = OrderUuid::new();
        let mut payments = MockPaymentsService::new();

        payments
            .expect_retry_payment()
            .once()
            .withf(move |user, o| *user == TEST_USER_UUID && *o == order)
            .return_once(|_, _| {
                Ok(GatewayCheckout {
                    gateway_order_id: "order_gw_2".to_string(),
                    amount: 185_00,
                    currency: "INR".to_string(),
                    key_id: "rzp_test_key".to_string(),
                })
            });

        let mut res = TestClient::post(retry_url(order))
            .send(&make_service(payments))
            .await;

        let body: GatewayCheckoutResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.gateway_order_id, "order_gw_2");
        assert_eq!(body.currency, "INR");

        Ok(())
    }

    #[tokio::test]
    async fn retrying_a_paid_payment_returns_422() {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_retry_payment()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::AlreadyPaid));

        let res = TestClient::post(retry_url(OrderUuid::new()))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn gateway_outage_returns_502() {
        let mut payments = MockPaymentsService::new();

        payments.expect_retry_payment().once().return_once(|_, _| {
            Err(PaymentsServiceError::Gateway(GatewayError::UnexpectedResponse(
                "503 Service Unavailable".to_string(),
            )))
        });

        let res = TestClient::post(retry_url(OrderUuid::new()))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));
    }
}
