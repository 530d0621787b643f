//! Pricing
//!
//! Turns a cart's lines (list price, quantity, optional product offer) and an optional coupon
//! into a [`PricingSnapshot`]: per-line discounted prices and the cart-level totals a checkout
//! charges.

use decimal_percentage::Percentage;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    discounts::{self, DiscountError},
    money,
};

/// Most units of one product a single cart may hold.
pub const MAX_QUANTITY_PER_PRODUCT: u32 = 5;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Percentage or ratio arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A line total did not fit in the minor unit range.
    #[error("line total overflowed")]
    Overflow,
}

/// Errors raised when a cart line quantity is not acceptable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineQuantityError {
    /// Quantities must be at least one.
    #[error("quantity must be at least one")]
    Zero,

    /// Per-product cap exceeded.
    #[error("quantity {requested} exceeds the limit of {cap} per product")]
    CapExceeded {
        /// Requested quantity
        requested: u32,

        /// Per-product cap
        cap: u32,
    },

    /// Not enough stock to cover the quantity.
    #[error("only {available} in stock, {requested} requested")]
    OutOfStock {
        /// Requested quantity
        requested: u32,

        /// Units available
        available: u32,
    },
}

/// Check a cart line quantity against the per-product cap and the available stock.
///
/// # Errors
///
/// Returns a [`LineQuantityError`] describing the first rule the quantity breaks.
pub fn check_line_quantity(requested: u32, available: u32) -> Result<(), LineQuantityError> {
    if requested == 0 {
        return Err(LineQuantityError::Zero);
    }

    if requested > MAX_QUANTITY_PER_PRODUCT {
        return Err(LineQuantityError::CapExceeded {
            requested,
            cap: MAX_QUANTITY_PER_PRODUCT,
        });
    }

    if requested > available {
        return Err(LineQuantityError::OutOfStock {
            requested,
            available,
        });
    }

    Ok(())
}

/// One cart line as handed over by the cart collaborator.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    /// List price of one unit
    pub price: Money<'a, Currency>,

    /// Units in the cart
    pub quantity: u32,

    /// Active product offer, if any
    pub offer: Option<Percentage>,
}

/// A priced cart line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine<'a> {
    /// List price of one unit
    pub price: Money<'a, Currency>,

    /// Price of one unit after the product offer
    pub discounted_price: Money<'a, Currency>,

    /// Units in the cart
    pub quantity: u32,

    /// `quantity × discounted_price`
    pub total_price: Money<'a, Currency>,

    /// Offer percentage that produced the discounted price
    pub discount_percentage: Option<Percentage>,
}

impl<'a> PricedLine<'a> {
    fn price(line: &CartLine<'a>) -> Result<Self, PricingError> {
        let price_minor = line.price.to_minor_units();

        let offer = line.offer.filter(discounts::is_positive);

        let discounted_minor = match &offer {
            Some(percent) => discounts::minor_after_percent_off(percent, price_minor)?,
            None => price_minor,
        };

        let total_minor = discounted_minor
            .checked_mul(i64::from(line.quantity))
            .ok_or(PricingError::Overflow)?;

        let currency = line.price.currency();

        Ok(Self {
            price: line.price,
            discounted_price: Money::from_minor(discounted_minor, currency),
            quantity: line.quantity,
            total_price: Money::from_minor(total_minor, currency),
            discount_percentage: offer,
        })
    }

    /// Amount the product offer takes off this line, `(price − discounted_price) × quantity`.
    ///
    /// # Errors
    ///
    /// Returns an error on currency mismatch or overflow.
    pub fn offer_savings(&self) -> Result<Money<'a, Currency>, PricingError> {
        let per_unit = self
            .price
            .to_minor_units()
            .checked_sub(self.discounted_price.to_minor_units())
            .ok_or(PricingError::Overflow)?;

        let savings = per_unit
            .checked_mul(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(savings, self.price.currency()))
    }
}

/// Terms of a cart-level coupon.
#[derive(Debug, Clone, Copy)]
pub struct CouponTerms<'a> {
    /// Percentage off the cart subtotal
    pub discount: Percentage,

    /// Subtotal the cart must reach before the coupon applies
    pub min_purchase: Money<'a, Currency>,

    /// Most the coupon may take off
    pub max_discount: Money<'a, Currency>,
}

impl<'a> CouponTerms<'a> {
    /// Discount this coupon grants on `subtotal`, or `None` when the minimum is not met.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage calculation overflows.
    pub fn discount_on(
        &self,
        subtotal: Money<'a, Currency>,
    ) -> Result<Option<Money<'a, Currency>>, PricingError> {
        if subtotal.to_minor_units() < self.min_purchase.to_minor_units() {
            return Ok(None);
        }

        let percent_off = discounts::percent_of_minor(&self.discount, subtotal.to_minor_units())?;

        Ok(Some(money::min(
            Money::from_minor(percent_off, subtotal.currency()),
            self.max_discount,
        )))
    }
}

/// Pricing Snapshot of a cart.
#[derive(Debug, Clone)]
pub struct PricingSnapshot<'a> {
    lines: SmallVec<[PricedLine<'a>; 8]>,
    subtotal: Money<'a, Currency>,
    product_discount: Money<'a, Currency>,
    coupon_discount: Money<'a, Currency>,
    coupon_detached: bool,
    payable: Money<'a, Currency>,
}

impl<'a> PricingSnapshot<'a> {
    /// Priced lines, in cart order
    #[must_use]
    pub fn lines(&self) -> &[PricedLine<'a>] {
        &self.lines
    }

    /// Sum of line totals
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Sum of product offer savings
    #[must_use]
    pub fn product_discount(&self) -> Money<'a, Currency> {
        self.product_discount
    }

    /// Sum of list prices before any offer, `subtotal + product_discount`
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] on currency mismatch.
    pub fn list_total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.add(self.product_discount)
    }

    /// Amount the coupon takes off the subtotal
    #[must_use]
    pub fn coupon_discount(&self) -> Money<'a, Currency> {
        self.coupon_discount
    }

    /// Whether a coupon was offered but dropped because the minimum purchase was not met
    #[must_use]
    pub fn coupon_detached(&self) -> bool {
        self.coupon_detached
    }

    /// Final payable amount
    #[must_use]
    pub fn payable(&self) -> Money<'a, Currency> {
        self.payable
    }

    /// Whether there is nothing to pay for
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Price a cart.
///
/// # Errors
///
/// Returns a [`PricingError`] on overflow or when a line is priced in another currency.
pub fn price_cart<'a>(
    lines: &[CartLine<'a>],
    coupon: Option<&CouponTerms<'a>>,
    currency: &'a Currency,
) -> Result<PricingSnapshot<'a>, PricingError> {
    let priced = lines
        .iter()
        .map(PricedLine::price)
        .collect::<Result<SmallVec<[PricedLine<'a>; 8]>, _>>()?;

    let zero = Money::from_minor(0, currency);

    let subtotal = priced
        .iter()
        .try_fold(zero, |acc, line| acc.add(line.total_price))?;

    let product_discount = priced.iter().try_fold(zero, |acc, line| {
        Ok::<_, PricingError>(acc.add(line.offer_savings()?)?)
    })?;

    let (coupon_discount, coupon_detached) = match coupon {
        Some(terms) => match terms.discount_on(subtotal)? {
            Some(discount) => (discount, false),
            None => (zero, true),
        },
        None => (zero, false),
    };

    let payable = money::saturating_sub(subtotal, coupon_discount);

    Ok(PricingSnapshot {
        lines: priced,
        subtotal,
        product_discount,
        coupon_discount,
        coupon_detached,
        payable,
    })
}
