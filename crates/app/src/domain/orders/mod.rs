//! Orders
//!
//! Orders, their items and payment breakdowns, and every reversal: whole-order cancellation,
//! single-item cancellation and returns. A reversal restocks what was taken from stock and
//! refunds what was paid, in one transaction with the status change.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
