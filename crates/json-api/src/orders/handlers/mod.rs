//! Order Handlers

pub(crate) mod cancel;
pub(crate) mod cancel_item;
pub(crate) mod complete_item;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod return_item;
