//! Address Data

use crate::domain::addresses::records::AddressUuid;

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}
