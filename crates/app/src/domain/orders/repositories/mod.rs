//! Order Repositories

mod details;
mod items;
mod orders;

pub(crate) use details::PgPaymentDetailsRepository;
pub(crate) use items::PgOrderItemsRepository;
pub(crate) use orders::PgOrdersRepository;
