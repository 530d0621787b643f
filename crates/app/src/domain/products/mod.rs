//! Products
//!
//! The catalog owns products; settlement reads prices and offers and moves stock.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use service::*;
