//! Caller identity
//!
//! Callers are authenticated upstream; the edge proxy forwards the user's id in `X-User-Uuid`.

pub(crate) mod middleware;

pub(crate) const USER_UUID_HEADER: &str = "x-user-uuid";
