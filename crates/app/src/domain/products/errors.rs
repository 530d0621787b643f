//! Products service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
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

    #[error("not enough stock")]
    OutOfStock,
}

impl From<Error> for ProductsServiceError {
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

/// Failures of the stock ledger inside a caller's unit of work.
#[derive(Debug, Error)]
pub enum StockLedgerError {
    #[error("product {0} not found")]
    NotFound(ProductUuid),

    #[error("product {product} has {available} in stock, {requested} requested")]
    OutOfStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("stock counter overflowed")]
    Overflow,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<StockLedgerError> for ProductsServiceError {
    fn from(error: StockLedgerError) -> Self {
        match error {
            StockLedgerError::NotFound(_) => Self::NotFound,
            StockLedgerError::OutOfStock { .. } => Self::OutOfStock,
            StockLedgerError::Overflow => Self::InvalidData,
            StockLedgerError::Sql(source) => Self::from(source),
        }
    }
}
