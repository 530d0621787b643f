//! Settlement Domain Concerns

pub mod addresses;
pub mod carts;
pub mod checkout;
pub mod coupons;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;
pub mod wallets;
