//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use settle_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment already exists")
        }
        PaymentsServiceError::NotFound => StatusError::not_found(),
        PaymentsServiceError::InvalidReference
        | PaymentsServiceError::MissingRequiredData
        | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::SignatureMismatch => {
            StatusError::unauthorized().brief("Signature does not match")
        }
        PaymentsServiceError::AlreadyPaid => {
            StatusError::unprocessable_entity().brief("Payment is already paid")
        }
        PaymentsServiceError::NotRetryable => {
            StatusError::unprocessable_entity().brief("Payment cannot be retried")
        }
        PaymentsServiceError::OutOfStock {
            product, available, ..
        } => StatusError::conflict().brief(format!(
            "Only {available} of product {product} left in stock"
        )),
        PaymentsServiceError::Gateway(source) => {
            error!("payment gateway failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        PaymentsServiceError::InvalidSigningKey => {
            error!("webhook secret cannot key callback signatures");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::InvalidAmount(source) => {
            error!("payment amount out of range: {source}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Stock(source) => {
            error!("failed to commit stock for payment: {source}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Wallet(source) => {
            error!("failed to refund payment to wallet: {source}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
