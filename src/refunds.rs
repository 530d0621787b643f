//! Refunds
//!
//! When one item of an order is canceled or returned, the coupon that was applied to the whole
//! order is apportioned by the ratio `R = coupon_savings / final_order_amount`, taken from the
//! breakdown as it stands at the moment of the reversal.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{self, DiscountError},
    money,
    pricing::PricingSnapshot,
};

/// Refund calculation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefundError {
    /// Ratio arithmetic failed
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Financial breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentBreakdown<'a> {
    /// Subtotal at list prices, before any offer
    pub order_amount: Money<'a, Currency>,

    /// Sum of product offer discounts
    pub order_discount: Money<'a, Currency>,

    /// Coupon discount still attributed to the order
    pub coupon_savings: Money<'a, Currency>,

    /// Amount still attributed to the order after discounts
    pub final_order_amount: Money<'a, Currency>,
}

/// Money owed back for one reversed item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRefund<'a> {
    /// Share of the coupon attributed to the item
    pub item_discount: Money<'a, Currency>,

    /// Amount credited back to the customer
    pub refund: Money<'a, Currency>,
}

impl<'a> PaymentBreakdown<'a> {
    /// Breakdown for an order placed from `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns a [`rusty_money::MoneyError`] on currency mismatch.
    pub fn from_snapshot(
        snapshot: &PricingSnapshot<'a>,
    ) -> Result<Self, rusty_money::MoneyError> {
        Ok(Self {
            order_amount: snapshot.list_total()?,
            order_discount: snapshot.product_discount(),
            coupon_savings: snapshot.coupon_discount(),
            final_order_amount: snapshot.payable(),
        })
    }

    /// `coupon_savings / final_order_amount`, or zero without a coupon.
    #[must_use]
    pub fn coupon_ratio(&self) -> Decimal {
        let savings = self.coupon_savings.to_minor_units();
        let final_amount = self.final_order_amount.to_minor_units();

        if savings <= 0 || final_amount <= 0 {
            return Decimal::ZERO;
        }

        Decimal::from(savings) / Decimal::from(final_amount)
    }

    /// Refund owed for reversing an item worth `item_total`, and the breakdown left afterwards.
    ///
    /// Coupon savings shrink by the item's share of the coupon and the final amount by the full
    /// item total; neither goes below zero.
    ///
    /// # Errors
    ///
    /// Returns a [`RefundError`] if the ratio arithmetic overflows.
    pub fn refund_item(
        &self,
        item_total: Money<'a, Currency>,
    ) -> Result<(ItemRefund<'a>, Self), RefundError> {
        let currency = item_total.currency();

        let savings = self.coupon_savings.to_minor_units();
        let final_amount = self.final_order_amount.to_minor_units();

        let item_discount_minor = if savings > 0 && final_amount > 0 {
            discounts::ratio_of_minor(item_total.to_minor_units(), savings, final_amount)?
        } else {
            0
        };

        let item_discount = Money::from_minor(item_discount_minor, currency);

        let refund = ItemRefund {
            item_discount,
            refund: money::saturating_sub(item_total, item_discount),
        };

        let remaining = Self {
            coupon_savings: money::saturating_sub(self.coupon_savings, item_discount),
            final_order_amount: money::saturating_sub(self.final_order_amount, item_total),
            ..*self
        };

        Ok((refund, remaining))
    }
}
