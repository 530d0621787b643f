//! Payments service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{
        products::{errors::StockLedgerError, records::ProductUuid},
        wallets::errors::WalletLedgerError,
    },
    gateway::GatewayError,
};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment already exists")]
    AlreadyExists,

    #[error("payment or order not found")]
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

    #[error("callback signature does not match")]
    SignatureMismatch,

    #[error("webhook secret cannot key the signature")]
    InvalidSigningKey,

    #[error("payment is already paid")]
    AlreadyPaid,

    #[error("payment cannot be retried")]
    NotRetryable,

    #[error("payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    OutOfStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("stock ledger error")]
    Stock(#[source] StockLedgerError),

    #[error("failed to refund to wallet")]
    Wallet(#[source] WalletLedgerError),
}

impl From<StockLedgerError> for PaymentsServiceError {
    fn from(error: StockLedgerError) -> Self {
        match error {
            StockLedgerError::OutOfStock {
                product,
                requested,
                available,
            } => Self::OutOfStock {
                product,
                requested,
                available,
            },
            StockLedgerError::Sql(source) => Self::from(source),
            other => Self::Stock(other),
        }
    }
}

impl From<WalletLedgerError> for PaymentsServiceError {
    fn from(error: WalletLedgerError) -> Self {
        match error {
            WalletLedgerError::Sql(source) => Self::from(source),
            other => Self::Wallet(other),
        }
    }
}

impl From<Error> for PaymentsServiceError {
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
