//! Cart pricing
//!
//! Turns stored cart items into the core's [`CartLine`]s, prices them and writes the cached
//! totals back onto the cart and its items.

use std::num::TryFromIntError;

use settle::{
    money::CURRENCY,
    pricing::{CartLine, PricingError, PricingSnapshot, price_cart},
};
use sqlx::{Postgres, Transaction};
use thiserror::Error;

use crate::{
    amounts,
    domain::{
        carts::{
            records::{CartItemRecord, CartRecord, CartSummary},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        coupons::{records::CouponRecord, repository::PgCouponsRepository},
    },
};

#[derive(Debug, Error)]
pub enum CartPricingError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("amount out of range")]
    InvalidAmount(#[from] TryFromIntError),
}

/// A cart priced inside the current transaction.
#[derive(Debug)]
pub(crate) struct PricedCart {
    pub(crate) summary: CartSummary,
    pub(crate) coupon: Option<CouponRecord>,
    pub(crate) snapshot: PricingSnapshot<'static>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CartPricer {
    carts: PgCartsRepository,
    items: PgCartItemsRepository,
    coupons: PgCouponsRepository,
}

impl CartPricer {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Recompute `cart`'s snapshot and persist it. A coupon whose minimum is no longer met is
    /// detached from the cart.
    pub(crate) async fn reprice<E>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRecord,
    ) -> Result<PricedCart, E>
    where
        E: From<sqlx::Error> + From<CartPricingError>,
    {
        let mut items = self.items.get_cart_items(tx, cart.uuid).await?;

        let coupon = match cart.coupon_uuid {
            Some(coupon) => Some(self.coupons.get_coupon(tx, coupon).await?),
            None => None,
        };

        let snapshot = price_items(&items, coupon.as_ref())?;

        apply_to_items(&mut items, &snapshot)?;

        for item in &items {
            self.items.update_priced_item(tx, item).await?;
        }

        let mut summary = summarise(cart, items, coupon.as_ref(), &snapshot)?;

        let coupon_uuid = if summary.coupon_detached {
            None
        } else {
            summary.cart.coupon_uuid
        };

        summary.cart = self
            .carts
            .update_totals(
                tx,
                summary.cart.uuid,
                summary.payable,
                coupon_uuid,
                summary.coupon_discount,
            )
            .await?;

        Ok(PricedCart {
            summary,
            coupon: coupon.filter(|_| coupon_uuid.is_some()),
            snapshot,
        })
    }
}

/// Price `items` at their products' current price and offer, with `coupon` if one is applied.
fn price_items(
    items: &[CartItemRecord],
    coupon: Option<&CouponRecord>,
) -> Result<PricingSnapshot<'static>, CartPricingError> {
    let lines = items
        .iter()
        .map(|item| {
            Ok(CartLine {
                price: amounts::to_money(item.product_price)?,
                quantity: item.quantity,
                offer: item.product_offer,
            })
        })
        .collect::<Result<Vec<_>, TryFromIntError>>()?;

    let terms = coupon.map(CouponRecord::terms).transpose()?;

    Ok(price_cart(&lines, terms.as_ref(), CURRENCY)?)
}

/// Copy the snapshot's per-line figures onto the items they were priced from.
fn apply_to_items(
    items: &mut [CartItemRecord],
    snapshot: &PricingSnapshot<'_>,
) -> Result<(), CartPricingError> {
    for (item, line) in items.iter_mut().zip(snapshot.lines()) {
        item.price = amounts::to_minor(line.price)?;
        item.discounted_price = amounts::to_minor(line.discounted_price)?;
        item.discount_percentage = line.discount_percentage;
        item.total_price = amounts::to_minor(line.total_price)?;
    }

    Ok(())
}

/// Summarise a priced cart. The coupon is dropped from the summary when it was detached.
fn summarise(
    cart: CartRecord,
    items: Vec<CartItemRecord>,
    coupon: Option<&CouponRecord>,
    snapshot: &PricingSnapshot<'_>,
) -> Result<CartSummary, CartPricingError> {
    let coupon_code = coupon
        .filter(|_| !snapshot.coupon_detached())
        .map(|coupon| coupon.code.clone());

    Ok(CartSummary {
        cart,
        items,
        coupon_code,
        subtotal: amounts::to_minor(snapshot.subtotal())?,
        product_discount: amounts::to_minor(snapshot.product_discount())?,
        coupon_discount: amounts::to_minor(snapshot.coupon_discount())?,
        payable: amounts::to_minor(snapshot.payable())?,
        coupon_detached: snapshot.coupon_detached(),
    })
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::domain::{
        carts::records::{CartItemUuid, CartUuid},
        coupons::records::CouponUuid,
        products::records::ProductUuid,
        users::UserUuid,
    };

    use super::*;

    fn item(product_price: u64, quantity: u32, offer: Option<Percentage>) -> CartItemRecord {
        CartItemRecord {
            uuid: CartItemUuid::new(),
            cart_uuid: CartUuid::new(),
            product_uuid: ProductUuid::new(),
            product_name: "Cotton kurta".to_string(),
            quantity,
            price: 0,
            discounted_price: 0,
            discount_percentage: None,
            total_price: 0,
            product_price,
            product_offer: offer,
            product_stock: 10,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn coupon(min_purchase_amount: u64) -> CouponRecord {
        CouponRecord {
            uuid: CouponUuid::new(),
            code: "SAVE10".to_string(),
            discount: Percentage::from(0.10),
            min_purchase_amount,
            max_discount_amount: 15_00,
            max_usage: 10,
            usage_count: 0,
            expires_at: Timestamp::MAX,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn prices_at_current_product_price() -> TestResult {
        let mut items = vec![item(100_00, 2, Some(Percentage::from(0.25)))];

        let snapshot = price_items(&items, None)?;

        apply_to_items(&mut items, &snapshot)?;

        let priced = items.first().ok_or("Expected a priced item")?;

        assert_eq!(priced.price, 100_00);
        assert_eq!(priced.discounted_price, 75_00);
        assert_eq!(priced.total_price, 150_00);
        assert_eq!(snapshot.payable().to_minor_units(), 150_00);

        Ok(())
    }

    #[test]
    fn summary_hides_detached_coupon() -> TestResult {
        let items = vec![item(100_00, 1, None)];
        let coupon = coupon(150_00);

        let snapshot = price_items(&items, Some(&coupon))?;
        let cart = CartRecord {
            uuid: CartUuid::new(),
            user_uuid: UserUuid::new(),
            cart_total: 0,
            coupon_uuid: Some(coupon.uuid),
            coupon_discount: 0,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        };

        let summary = summarise(cart, items, Some(&coupon), &snapshot)?;

        assert!(summary.coupon_detached);
        assert_eq!(summary.coupon_code, None);
        assert_eq!(summary.payable, 100_00);

        Ok(())
    }
}
