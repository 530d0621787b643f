//! Wallet Errors

use salvo::http::StatusError;
use tracing::error;

use settle_app::domain::wallets::WalletsServiceError;

pub(crate) fn into_status_error(error: WalletsServiceError) -> StatusError {
    match error {
        WalletsServiceError::NotFound => StatusError::not_found(),
        WalletsServiceError::InvalidData => StatusError::bad_request().brief("Invalid wallet request"),
        WalletsServiceError::InsufficientFunds { balance, requested } => StatusError::conflict()
            .brief(format!("Wallet balance {balance} does not cover {requested}")),
        WalletsServiceError::InvalidAmount(source) => {
            error!("wallet amount out of range: {source}");

            StatusError::internal_server_error()
        }
        WalletsServiceError::Ledger(source) => {
            error!("wallet ledger is inconsistent: {source}");

            StatusError::internal_server_error()
        }
        WalletsServiceError::Sql(source) => {
            error!("wallet storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
