//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use settle_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::MissingReturnReason => {
            StatusError::bad_request().brief("A return reason is required")
        }
        OrdersServiceError::PaymentPending => {
            StatusError::conflict().brief("The order's payment has not settled yet")
        }
        OrdersServiceError::InvalidTransition(source) => {
            StatusError::unprocessable_entity().brief(source.to_string())
        }
        OrdersServiceError::ReturnWindowExpired => {
            StatusError::unprocessable_entity().brief("The return window has closed")
        }
        OrdersServiceError::InvalidAmount(source) => {
            error!("order amount out of range: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Refund(source) => {
            error!("failed to compute refund: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Stock(source) => {
            error!("failed to restock order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Wallet(source) => {
            error!("failed to refund order to wallet: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
