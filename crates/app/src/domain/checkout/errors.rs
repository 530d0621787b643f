//! Checkout service errors.

use std::num::TryFromIntError;

use settle::coupons::CouponUnavailable;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{
        carts::snapshot::CartPricingError,
        products::{errors::StockLedgerError, records::ProductUuid},
        wallets::errors::WalletLedgerError,
    },
    gateway::GatewayError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("cart, address or product not found")]
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

    #[error("cart is empty")]
    EmptyCart,

    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    OutOfStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("quantity for {product} exceeds the cap of {cap}")]
    QuantityCapExceeded { product: ProductUuid, cap: u32 },

    #[error("insufficient wallet balance: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },

    #[error(transparent)]
    CouponUnavailable(#[from] CouponUnavailable),

    #[error("cart changed while the payment was being prepared")]
    CartChanged,

    #[error("failed to price cart")]
    Pricing(#[from] CartPricingError),

    #[error("payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error("stock ledger error")]
    Stock(#[source] StockLedgerError),

    #[error("wallet ledger error")]
    Wallet(#[source] WalletLedgerError),
}

impl From<StockLedgerError> for CheckoutServiceError {
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

impl From<WalletLedgerError> for CheckoutServiceError {
    fn from(error: WalletLedgerError) -> Self {
        match error {
            WalletLedgerError::InsufficientFunds { balance, requested } => {
                Self::InsufficientFunds { balance, requested }
            }
            WalletLedgerError::Sql(source) => Self::from(source),
            other => Self::Wallet(other),
        }
    }
}

impl From<Error> for CheckoutServiceError {
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
