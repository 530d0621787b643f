//! Extension traits

mod depot;
mod response;

pub(crate) use depot::DepotExt as _;
pub(crate) use response::CreatedExt as _;
