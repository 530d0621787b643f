//! Carts
//!
//! A user's cart and its cached Pricing Snapshot. Totals are recomputed from current product
//! prices and offers every time the cart is read or changed, and written back in the same
//! transaction.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod snapshot;

pub use errors::CartsServiceError;
pub use service::*;
