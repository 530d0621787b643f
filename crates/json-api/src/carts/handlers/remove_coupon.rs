//! Remove Coupon Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Coupon Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Coupon removed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .remove_coupon(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use settle_app::domain::carts::MockCartsService;

    use crate::test_helpers::{TEST_USER_UUID, make_cart_summary, strict_app, user_service};

    use super::*;

    #[tokio::test]
    async fn remove_coupon_returns_cart_without_code() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_coupon()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| {
                let mut summary = make_cart_summary();
                summary.coupon_code = None;
                summary.coupon_discount = 0;
                summary.payable = summary.subtotal;

                Ok(summary)
            });

        let mut app = strict_app();
        app.carts = Arc::new(carts);

        let mut res = TestClient::delete("http://example.com/cart/coupon")
            .send(&user_service(
                app,
                Router::with_path("cart/coupon").delete(handler),
            ))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.coupon_code, None);
        assert_eq!(body.payable, 200_00);

        Ok(())
    }
}
