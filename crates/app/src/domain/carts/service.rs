//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use settle::pricing::check_line_quantity;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemUuid, CartSummary},
            repositories::{PgCartItemsRepository, PgCartsRepository},
            snapshot::CartPricer,
        },
        coupons::repository::PgCouponsRepository,
        products::repository::PgProductsRepository,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    items: PgCartItemsRepository,
    coupons: PgCouponsRepository,
    products: PgProductsRepository,
    pricer: CartPricer,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            items: PgCartItemsRepository::new(),
            coupons: PgCouponsRepository::new(),
            products: PgProductsRepository::new(),
            pricer: CartPricer::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn get_cart(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.carts.ensure_cart(&mut tx, user).await?;
        let priced = self.pricer.reprice::<CartsServiceError>(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(priced.summary)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartSummary, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let cart = self.carts.ensure_cart(&mut tx, user).await?;
        let product = self.products.get_product(&mut tx, item.product_uuid).await?;

        if !product.active && product.stock > 0 {
            return Err(CartsServiceError::NotFound);
        }

        let existing = self
            .items
            .get_item_quantity(&mut tx, cart.uuid, item.product_uuid)
            .await?
            .unwrap_or(0);

        let quantity = existing.saturating_add(item.quantity);

        Span::current().record("quantity", quantity);

        check_line_quantity(quantity, product.stock)?;

        self.items
            .upsert_cart_item(&mut tx, cart.uuid, &NewCartItem { quantity, ..item })
            .await?;

        let priced = self.pricer.reprice::<CartsServiceError>(&mut tx, cart).await?;

        tx.commit().await?;

        info!(cart_uuid = %priced.summary.cart.uuid, quantity, "added item to cart");

        Ok(priced.summary)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(user_uuid = %user, cart_item_uuid = %item),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.carts.ensure_cart(&mut tx, user).await?;

        let rows_affected = self.items.delete_cart_item(&mut tx, cart.uuid, item).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let priced = self.pricer.reprice::<CartsServiceError>(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(priced.summary)
    }

    #[tracing::instrument(
        name = "carts.service.apply_coupon",
        skip(self),
        fields(user_uuid = %user, coupon_uuid = tracing::field::Empty),
        err
    )]
    async fn apply_coupon(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupon = self.coupons.get_coupon_by_code(&mut tx, code).await?;

        Span::current().record("coupon_uuid", tracing::field::display(coupon.uuid));

        coupon.check_available(Timestamp::now())?;

        let cart = self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.set_coupon(&mut tx, cart.uuid, Some(coupon.uuid)).await?;

        let priced = self.pricer.reprice::<CartsServiceError>(&mut tx, cart).await?;

        if priced.summary.coupon_detached {
            return Err(CartsServiceError::CouponMinimumNotMet {
                min_purchase: coupon.min_purchase_amount,
            });
        }

        tx.commit().await?;

        info!(
            cart_uuid = %priced.summary.cart.uuid,
            coupon_discount = priced.summary.coupon_discount,
            "applied coupon"
        );

        Ok(priced.summary)
    }

    #[tracing::instrument(
        name = "carts.service.remove_coupon",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn remove_coupon(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.carts.ensure_cart(&mut tx, user).await?;
        let cart = self.carts.set_coupon(&mut tx, cart.uuid, None).await?;

        let priced = self.pricer.reprice::<CartsServiceError>(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(priced.summary)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, repriced at current product prices.
    async fn get_cart(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError>;

    /// Add units of a product, merging into the existing line for that product.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartSummary, CartsServiceError>;

    /// Remove a line from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<CartSummary, CartsServiceError>;

    /// Apply a coupon by code.
    async fn apply_coupon(&self, user: UserUuid, code: &str)
    -> Result<CartSummary, CartsServiceError>;

    /// Detach the cart's coupon.
    async fn remove_coupon(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use settle::coupons::CouponUnavailable;
    use testresult::TestResult;

    use crate::{
        domain::{
            coupons::{CouponsService, data::NewCoupon},
            products::records::ProductUuid,
        },
        test::{
            TestContext,
            helpers::{
                add_to_cart, create_coupon, create_product, create_product_with_offer, new_coupon,
            },
        },
    };

    use super::*;

    #[tokio::test]
    async fn get_cart_for_new_user_is_empty() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx.carts.get_cart(UserUuid::new()).await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.payable, 0);
        assert_eq!(cart.coupon_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_prices_single_line_without_coupon() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 100_00, 10).await?;

        let cart = add_to_cart(&ctx, user, product.uuid, 2).await?;

        assert_eq!(cart.subtotal, 200_00);
        assert_eq!(cart.payable, 200_00);
        assert_eq!(cart.cart.cart_total, 200_00);

        let item = cart.items.first().ok_or("Expected a cart item")?;

        assert_eq!(item.quantity, 2);
        assert_eq!(item.total_price, 200_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_merges_into_existing_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 10_00, 10).await?;

        add_to_cart(&ctx, user, product.uuid, 2).await?;
        let cart = add_to_cart(&ctx, user, product.uuid, 3).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|item| item.quantity), Some(5));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_past_cap_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 10_00, 10).await?;

        add_to_cart(&ctx, user, product.uuid, 4).await?;

        let result = add_to_cart(&ctx, user, product.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::QuantityCapExceeded { cap: 5 })),
            "expected QuantityCapExceeded, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_beyond_stock_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 10_00, 1).await?;

        let result = add_to_cart(&ctx, UserUuid::new(), product.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::OutOfStock { available: 1 })),
            "expected OutOfStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 10_00, 1).await?;

        let result = add_to_cart(&ctx, UserUuid::new(), product.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = add_to_cart(&ctx, UserUuid::new(), ProductUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn product_offer_lowers_line_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product_with_offer(&ctx, 100_00, Percentage::from(0.20)).await?;

        let cart = add_to_cart(&ctx, user, product.uuid, 1).await?;

        assert_eq!(cart.payable, 80_00);
        assert_eq!(cart.product_discount, 20_00);

        Ok(())
    }

    #[tokio::test]
    async fn apply_coupon_caps_discount_at_maximum() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 100_00, 10).await?;

        create_coupon(&ctx, "SAVE10").await?;
        add_to_cart(&ctx, user, product.uuid, 2).await?;

        let cart = ctx.carts.apply_coupon(user, "SAVE10").await?;

        assert_eq!(cart.coupon_discount, 15_00);
        assert_eq!(cart.payable, 185_00);
        assert_eq!(cart.coupon_code.as_deref(), Some("SAVE10"));

        Ok(())
    }

    #[tokio::test]
    async fn apply_coupon_below_minimum_leaves_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 100_00, 10).await?;

        create_coupon(&ctx, "SAVE10").await?;
        add_to_cart(&ctx, user, product.uuid, 1).await?;

        let result = ctx.carts.apply_coupon(user, "SAVE10").await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::CouponMinimumNotMet {
                    min_purchase: 150_00
                })
            ),
            "expected CouponMinimumNotMet, got {result:?}"
        );

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.payable, 100_00);
        assert_eq!(cart.coupon_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn removing_items_below_minimum_detaches_coupon() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let shirt = create_product(&ctx, 100_00, 10).await?;
        let socks = create_product(&ctx, 60_00, 10).await?;

        create_coupon(&ctx, "SAVE10").await?;
        add_to_cart(&ctx, user, shirt.uuid, 1).await?;
        let cart = add_to_cart(&ctx, user, socks.uuid, 1).await?;

        ctx.carts.apply_coupon(user, "SAVE10").await?;

        let socks_line = cart
            .items
            .iter()
            .find(|item| item.product_uuid == socks.uuid)
            .ok_or("Expected socks in cart")?;

        let cart = ctx.carts.remove_item(user, socks_line.uuid).await?;

        assert!(cart.coupon_detached);
        assert_eq!(cart.coupon_discount, 0);
        assert_eq!(cart.payable, 100_00);
        assert_eq!(cart.cart.coupon_uuid, None);

        Ok(())
    }

    #[tokio::test]
    async fn apply_unknown_coupon_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.apply_coupon(UserUuid::new(), "MISSING").await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn apply_exhausted_coupon_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.coupons
            .create_coupon(NewCoupon {
                max_usage: 0,
                ..new_coupon("GONE")
            })
            .await?;

        let result = ctx.carts.apply_coupon(user, "GONE").await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::CouponUnavailable(
                    CouponUnavailable::Exhausted
                ))
            ),
            "expected Exhausted, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_coupon_restores_full_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = create_product(&ctx, 100_00, 10).await?;

        create_coupon(&ctx, "SAVE10").await?;
        add_to_cart(&ctx, user, product.uuid, 2).await?;
        ctx.carts.apply_coupon(user, "SAVE10").await?;

        let cart = ctx.carts.remove_coupon(user).await?;

        assert_eq!(cart.payable, 200_00);
        assert_eq!(cart.coupon_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_item_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .remove_item(UserUuid::new(), CartItemUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
