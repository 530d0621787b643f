//! Route table

use salvo::Router;

use crate::{auth, carts, checkout, orders, payments, wallet};

/// Every API route. Everything except the gateway callback requires a caller identity.
pub(crate) fn api() -> Router {
    Router::new()
        .push(Router::with_path("payments/verify").post(payments::verify::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::add_item::handler)
                                .push(
                                    Router::with_path("{item}").delete(carts::remove_item::handler),
                                ),
                        )
                        .push(
                            Router::with_path("coupon")
                                .put(carts::apply_coupon::handler)
                                .delete(carts::remove_coupon::handler),
                        ),
                )
                .push(Router::with_path("checkout").post(checkout::place::handler))
                .push(
                    Router::with_path("orders").get(orders::index::handler).push(
                        Router::with_path("{order}")
                            .get(orders::get::handler)
                            .push(Router::with_path("cancel").post(orders::cancel::handler))
                            .push(
                                Router::with_path("payment")
                                    .get(payments::get::handler)
                                    .push(Router::with_path("retry").post(payments::retry::handler)),
                            )
                            .push(
                                Router::with_path("items/{item}")
                                    .push(
                                        Router::with_path("cancel")
                                            .post(orders::cancel_item::handler),
                                    )
                                    .push(
                                        Router::with_path("return")
                                            .post(orders::return_item::handler),
                                    )
                                    .push(
                                        Router::with_path("complete")
                                            .post(orders::complete_item::handler),
                                    ),
                            ),
                    ),
                )
                .push(
                    Router::with_path("wallet")
                        .get(wallet::get::handler)
                        .push(Router::with_path("history").get(wallet::history::handler)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use settle_app::domain::{
        carts::MockCartsService,
        payments::{MockPaymentsService, PaymentsServiceError},
        wallets::{MockWalletsService, records::WalletBalance},
    };

    use crate::{
        auth::USER_UUID_HEADER,
        state::State,
        test_helpers::{TEST_USER_UUID, strict_app},
    };

    use super::*;

    fn make_service(app: settle_app::context::AppContext) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(app)))
                .push(api()),
        )
    }

    #[tokio::test]
    async fn user_routes_require_identity() {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();

        let mut app = strict_app();
        app.carts = Arc::new(carts);

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn identity_header_reaches_the_service() -> TestResult {
        let mut wallets = MockWalletsService::new();

        wallets
            .expect_get_wallet()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|user| {
                Ok(WalletBalance {
                    user_uuid: user,
                    balance: 0,
                })
            });

        let mut app = strict_app();
        app.wallets = Arc::new(wallets);

        let mut res = TestClient::get("http://example.com/wallet")
            .add_header(USER_UUID_HEADER, TEST_USER_UUID.to_string(), true)
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(res.take_string().await?.contains("\"balance\":0"), "balance in body");

        Ok(())
    }

    #[tokio::test]
    async fn gateway_callback_is_not_behind_identity() {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_callback()
            .once()
            .return_once(|_| Err(PaymentsServiceError::SignatureMismatch));

        let mut app = strict_app();
        app.payments = Arc::new(payments);

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&serde_json::json!({
                "gateway_order_id": "order_gw_1",
                "gateway_payment_id": "pay_1",
                "signature": "forged",
            }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}
