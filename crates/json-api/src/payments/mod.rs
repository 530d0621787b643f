//! Payments

mod errors;
pub(crate) mod get;
pub(crate) mod retry;
pub(crate) mod verify;
