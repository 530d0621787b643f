//! Orders service errors.

use std::num::TryFromIntError;

use settle::{orders::StatusError, refunds::RefundError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{products::errors::StockLedgerError, wallets::errors::WalletLedgerError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order or order item not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("invalid amount")]
    InvalidAmount(#[from] TryFromIntError),

    #[error(transparent)]
    InvalidTransition(#[from] StatusError),

    #[error("the return window has closed")]
    ReturnWindowExpired,

    #[error("a return reason is required")]
    MissingReturnReason,

    #[error("the order's gateway payment has not settled")]
    PaymentPending,

    #[error("failed to compute refund")]
    Refund(#[from] RefundError),

    #[error("failed to restock")]
    Stock(#[source] StockLedgerError),

    #[error("failed to refund to wallet")]
    Wallet(#[source] WalletLedgerError),
}

impl From<StockLedgerError> for OrdersServiceError {
    fn from(error: StockLedgerError) -> Self {
        match error {
            StockLedgerError::Sql(source) => Self::from(source),
            other => Self::Stock(other),
        }
    }
}

impl From<WalletLedgerError> for OrdersServiceError {
    fn from(error: WalletLedgerError) -> Self {
        match error {
            WalletLedgerError::Sql(source) => Self::from(source),
            other => Self::Wallet(other),
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
