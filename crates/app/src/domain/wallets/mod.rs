//! Wallets
//!
//! A cash-equivalent balance per user and its append-only history. Every balance change writes
//! exactly one history row carrying the balance after the change.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::WalletsServiceError;
pub use service::*;

/// Credited to both the referrer and the new user on a referral.
pub const REFERRAL_CREDIT: u64 = 100_00;
