//! Wallets service errors.

use std::num::TryFromIntError;

use settle::wallet::WalletError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletsServiceError {
    #[error("wallet not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("invalid amount")]
    InvalidAmount(#[from] TryFromIntError),

    #[error("wallet balance {balance} does not cover {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error("wallet ledger is inconsistent")]
    Ledger(#[source] WalletError),
}

impl From<Error> for WalletsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<WalletLedgerError> for WalletsServiceError {
    fn from(error: WalletLedgerError) -> Self {
        match error {
            WalletLedgerError::InsufficientFunds { balance, requested } => {
                Self::InsufficientFunds { balance, requested }
            }
            WalletLedgerError::Ledger(source) => Self::Ledger(source),
            WalletLedgerError::InvalidAmount(source) => Self::InvalidAmount(source),
            WalletLedgerError::Sql(source) => Self::from(source),
        }
    }
}

/// Failures of the wallet ledger inside a caller's unit of work.
#[derive(Debug, Error)]
pub enum WalletLedgerError {
    #[error("wallet balance {balance} does not cover {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error(transparent)]
    Ledger(WalletError),

    #[error("invalid amount")]
    InvalidAmount(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[from] Error),
}
