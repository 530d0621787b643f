//! Product Records

use decimal_percentage::Percentage;
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock: u32,
    pub offer: Option<Percentage>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
