//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Reprices the caller's cart at current product prices and returns its pricing snapshot.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Pricing snapshot"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing caller identity"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use settle_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, make_cart_summary, strict_app, user_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let mut app = strict_app();
        app.carts = Arc::new(carts);

        user_service(app, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn get_cart_returns_snapshot() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(make_cart_summary()));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.payable, 185_00);
        assert_eq!(body.coupon_code.as_deref(), Some("SAVE10"));
        assert_eq!(body.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn pricing_failure_returns_500() -> TestResult {
        let overflow = u32::try_from(u64::MAX)
            .err()
            .ok_or("expected conversion to overflow")?;

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(move |_| Err(CartsServiceError::Pricing(overflow.into())));

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
