//! Cart Data

use crate::domain::{carts::records::CartItemUuid, products::records::ProductUuid};

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}
