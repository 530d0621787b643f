//! Carts service errors.

use settle::{coupons::CouponUnavailable, pricing::LineQuantityError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::carts::snapshot::CartPricingError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item already exists")]
    AlreadyExists,

    #[error("cart or cart item not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("quantity must be at least one")]
    InvalidQuantity,

    #[error("at most {cap} of a product per cart")]
    QuantityCapExceeded { cap: u32 },

    #[error("only {available} left in stock")]
    OutOfStock { available: u32 },

    #[error("coupon unavailable: {0}")]
    CouponUnavailable(#[from] CouponUnavailable),

    #[error("cart total is below the coupon's minimum purchase of {min_purchase}")]
    CouponMinimumNotMet { min_purchase: u64 },

    #[error("failed to price cart")]
    Pricing(#[from] CartPricingError),
}

impl From<LineQuantityError> for CartsServiceError {
    fn from(error: LineQuantityError) -> Self {
        match error {
            LineQuantityError::Zero => Self::InvalidQuantity,
            LineQuantityError::CapExceeded { cap, .. } => Self::QuantityCapExceeded { cap },
            LineQuantityError::OutOfStock { available, .. } => Self::OutOfStock { available },
        }
    }
}

impl From<Error> for CartsServiceError {
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
