//! Cart Handlers

pub(crate) mod add_item;
pub(crate) mod apply_coupon;
pub(crate) mod get;
pub(crate) mod remove_coupon;
pub(crate) mod remove_item;
