//! Checkout Errors

use salvo::http::StatusError;
use tracing::error;

use settle_app::domain::checkout::CheckoutServiceError;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::AlreadyExists => {
            StatusError::conflict().brief("Order already exists")
        }
        CheckoutServiceError::NotFound => StatusError::not_found(),
        CheckoutServiceError::InvalidReference
        | CheckoutServiceError::MissingRequiredData
        | CheckoutServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid checkout payload")
        }
        CheckoutServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::OutOfStock {
            product, available, ..
        } => StatusError::conflict().brief(format!(
            "Only {available} of product {product} left in stock"
        )),
        CheckoutServiceError::QuantityCapExceeded { product, cap } => StatusError::conflict()
            .brief(format!("At most {cap} of product {product} per order")),
        CheckoutServiceError::InsufficientFunds { balance, requested } => {
            StatusError::conflict().brief(format!(
                "Wallet balance {balance} does not cover {requested}"
            ))
        }
        CheckoutServiceError::CouponUnavailable(reason) => {
            StatusError::conflict().brief(format!("Coupon unavailable: {reason}"))
        }
        CheckoutServiceError::CartChanged => {
            StatusError::conflict().brief("Cart changed during checkout, please retry")
        }
        CheckoutServiceError::Gateway(source) => {
            error!("payment gateway failed during checkout: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        CheckoutServiceError::InvalidAmount(source) => {
            error!("checkout amount out of range: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Pricing(source) => {
            error!("failed to price cart at checkout: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Stock(source) => {
            error!("stock ledger failed during checkout: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Wallet(source) => {
            error!("wallet ledger failed during checkout: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
