//! Settlement services and their PostgreSQL persistence.

mod amounts;
pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;

#[cfg(test)]
mod test;

mod uuids;
