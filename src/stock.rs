//! Stock arithmetic
//!
//! The persistent ledger applies these rules while holding the product's row lock.

use thiserror::Error;

/// Stock errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StockError {
    /// Not enough units available.
    #[error("only {available} in stock, {requested} requested")]
    OutOfStock {
        /// Requested quantity
        requested: u32,

        /// Units available
        available: u32,
    },

    /// Restocking would overflow the counter.
    #[error("stock counter overflow")]
    Overflow,
}

/// Take `quantity` units out of `available`, returning what is left.
///
/// # Errors
///
/// Returns [`StockError::OutOfStock`] when `available < quantity`.
pub fn reserve(available: u32, quantity: u32) -> Result<u32, StockError> {
    available
        .checked_sub(quantity)
        .ok_or(StockError::OutOfStock {
            requested: quantity,
            available,
        })
}

/// Put `quantity` units back, returning the new level.
///
/// # Errors
///
/// Returns [`StockError::Overflow`] if the counter would overflow.
pub fn restock(available: u32, quantity: u32) -> Result<u32, StockError> {
    available.checked_add(quantity).ok_or(StockError::Overflow)
}

/// Whether a product with this much stock should be listed.
#[must_use]
pub fn is_listed(available: u32) -> bool {
    available > 0
}
