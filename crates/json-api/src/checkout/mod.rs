//! Checkout

mod errors;
pub(crate) mod place;
