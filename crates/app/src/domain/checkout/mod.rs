//! Checkout
//!
//! Turns a priced cart into an order and settles it with the chosen payment instrument.

pub mod data;
pub mod errors;
pub mod records;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
