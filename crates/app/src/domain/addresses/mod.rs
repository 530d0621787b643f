//! Addresses
//!
//! Shipping addresses are read once, at checkout, and copied onto the order.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::AddressesServiceError;
pub use service::*;
