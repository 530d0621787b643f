//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use settle_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Cart item already exists")
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be at least one")
        }
        CartsServiceError::QuantityCapExceeded { cap } => {
            StatusError::conflict().brief(format!("At most {cap} of a product per cart"))
        }
        CartsServiceError::OutOfStock { available } => {
            StatusError::conflict().brief(format!("Only {available} left in stock"))
        }
        CartsServiceError::CouponUnavailable(reason) => {
            StatusError::conflict().brief(format!("Coupon unavailable: {reason}"))
        }
        CartsServiceError::CouponMinimumNotMet { min_purchase } => StatusError::conflict()
            .brief(format!(
                "Cart total is below the coupon's minimum purchase of {min_purchase}"
            )),
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::Pricing(source) => {
            error!("failed to price cart: {source}");

            StatusError::internal_server_error()
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
