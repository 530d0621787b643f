//! Verify Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use settle_app::domain::payments::{
    PaymentsServiceError,
    data::GatewayCallback,
    records::CallbackOutcome,
};

use crate::{
    extensions::*,
    observability::{CallbackMetric, record_callback},
    orders::models::PaymentResponse,
    payments::errors::into_status_error,
    state::State,
};

/// Gateway callback as posted back by the shopper's browser.
///
/// Accepts the gateway's own `razorpay_*` field names as well.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub gateway_order_id: String,

    #[serde(alias = "razorpay_payment_id")]
    pub gateway_payment_id: String,

    /// Hex HMAC-SHA256 of `"{gateway_order_id}|{gateway_payment_id}"`
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

impl From<VerifyPaymentRequest> for GatewayCallback {
    fn from(request: VerifyPaymentRequest) -> Self {
        GatewayCallback {
            gateway_order_id: request.gateway_order_id,
            gateway_payment_id: request.gateway_payment_id,
            signature: request.signature,
        }
    }
}

/// Verify Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentResponse {
    pub payment: PaymentResponse,

    /// The callback had already been applied; nothing changed
    pub duplicate: bool,
}

impl From<CallbackOutcome> for VerifyPaymentResponse {
    fn from(outcome: CallbackOutcome) -> Self {
        let (payment, duplicate) = match outcome {
            CallbackOutcome::Applied(payment) => (payment, false),
            CallbackOutcome::Duplicate(payment) => (payment, true),
        };

        Self {
            payment: payment.into(),
            duplicate,
        }
    }
}

/// Verify Payment Handler
///
/// Authenticated by the callback signature rather than the caller's identity.
#[endpoint(
    tags("payments"),
    summary = "Verify Gateway Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment settled, or already settled"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Signature does not match"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown gateway order"),
        (status_code = StatusCode::CONFLICT, description = "Stock ran out before the payment settled"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<VerifyPaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = match state
        .app
        .payments
        .verify_callback(json.into_inner().into())
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => {
            if matches!(error, PaymentsServiceError::SignatureMismatch) {
                record_callback(CallbackMetric::Rejected);
            }

            return Err(into_status_error(error));
        }
    };

    record_callback(match outcome {
        CallbackOutcome::Applied(_) => CallbackMetric::Applied,
        CallbackOutcome::Duplicate(_) => CallbackMetric::Duplicate,
    });

    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use settle::payments::{PaymentMode, PaymentStatus};
    use testresult::TestResult;

    use settle_app::domain::{
        orders::records::OrderUuid,
        payments::{MockPaymentsService, records::PaymentRecord},
    };

    use crate::test_helpers::{anonymous_service, make_payment, strict_app};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        let mut app = strict_app();
        app.payments = Arc::new(payments);

        anonymous_service(app, Router::with_path("payments/verify").post(handler))
    }

    fn paid() -> PaymentRecord {
        let mut payment = make_payment(OrderUuid::new(), PaymentMode::Gateway, PaymentStatus::Paid);
        payment.gateway_payment_id = Some("pay_1".to_string());

        payment
    }

    #[tokio::test]
    async fn verified_callback_settles_without_a_caller_identity() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_callback()
            .once()
            .withf(|callback| {
                callback.gateway_order_id == "order_gw_1"
                    && callback.gateway_payment_id == "pay_1"
                    && callback.signature == "abc123"
            })
            .return_once(|_| Ok(CallbackOutcome::Applied(paid())));

        let mut res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "gateway_order_id": "order_gw_1",
                "gateway_payment_id": "pay_1",
                "signature": "abc123",
            }))
            .send(&make_service(payments))
            .await;

        let body: VerifyPaymentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.payment.status, "paid");
        assert_eq!(body.payment.gateway_payment_id.as_deref(), Some("pay_1"));
        assert!(!body.duplicate, "first callback is applied");

        Ok(())
    }

    #[tokio::test]
    async fn gateway_field_names_are_accepted() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_callback()
            .once()
            .withf(|callback| callback.gateway_order_id == "order_gw_1")
            .return_once(|_| Ok(CallbackOutcome::Duplicate(paid())));

        let mut res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "razorpay_order_id": "order_gw_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": "abc123",
            }))
            .send(&make_service(payments))
            .await;

        let body: VerifyPaymentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.duplicate, "replayed callback is reported as a duplicate");

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_signature_returns_401() {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_callback()
            .once()
            .return_once(|_| Err(PaymentsServiceError::SignatureMismatch));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "gateway_order_id": "order_gw_1",
                "gateway_payment_id": "pay_1",
                "signature": "forged",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn unknown_gateway_order_returns_404() {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_callback()
            .once()
            .return_once(|_| Err(PaymentsServiceError::NotFound));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "gateway_order_id": "order_missing",
                "gateway_payment_id": "pay_1",
                "signature": "abc123",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
