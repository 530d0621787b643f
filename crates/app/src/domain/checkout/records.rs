//! Checkout Records

use crate::domain::{orders::records::OrderSummary, payments::records::GatewayCheckout};

/// A placed order, with the gateway order to pay against for gateway checkouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub summary: OrderSummary,
    pub gateway: Option<GatewayCheckout>,
}
