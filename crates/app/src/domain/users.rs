//! Users
//!
//! Users are owned by the identity service; the settlement engine only ever holds their ids.

use crate::uuids::TypedUuid;

/// Marker for identifiers issued by the identity service.
#[derive(Debug)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;
