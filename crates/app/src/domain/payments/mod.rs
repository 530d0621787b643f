//! Payments
//!
//! Settlement of gateway payments: signed callbacks move a payment to paid and commit the
//! order's stock, and a pending payment can be retried against a fresh gateway order.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::PaymentsServiceError;
pub use service::*;

use crate::domain::orders::records::OrderUuid;

/// Receipt reference the gateway echoes back for an order.
pub(crate) fn receipt(order: OrderUuid) -> String {
    format!("order_{}", order.into_uuid().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Longest receipt the gateway accepts.
    const RECEIPT_MAX_LEN: usize = 40;

    #[test]
    fn receipt_fits_the_gateway_limit() {
        let order = OrderUuid::new();
        let receipt = receipt(order);

        assert!(
            receipt.len() <= RECEIPT_MAX_LEN,
            "{receipt} is {} characters",
            receipt.len()
        );
        assert_eq!(receipt, format!("order_{}", order.into_uuid().simple()));
    }
}
