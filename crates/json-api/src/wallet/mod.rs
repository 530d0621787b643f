//! Wallet

mod errors;
pub(crate) mod get;
pub(crate) mod history;
