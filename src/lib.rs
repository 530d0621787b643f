//! Settle
//!
//! Settle is the calculation core of an order-settlement engine: cart pricing with product
//! offers and coupons, proportional refunds, order and payment state machines, gateway
//! signature checks and wallet ledger arithmetic. Nothing in this crate performs I/O.

pub mod coupons;
pub mod discounts;
pub mod money;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod refunds;
pub mod signature;
pub mod stock;
pub mod wallet;
