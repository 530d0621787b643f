//! Payment instruments and payment status.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Payment parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentParseError {
    /// Unknown payment mode name
    #[error("unknown payment mode {0:?}")]
    UnknownMode(String),

    /// Unknown payment status name
    #[error("unknown payment status {0:?}")]
    UnknownStatus(String),
}

/// Payment instrument chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMode {
    /// Cash on delivery
    Cod,

    /// Debit from the customer's wallet
    Wallet,

    /// External payment gateway, settled by a verified callback
    Gateway,
}

impl PaymentMode {
    /// Persisted name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Wallet => "wallet",
            Self::Gateway => "gateway",
        }
    }

    /// Whether stock is committed while the order is placed rather than on the gateway callback.
    #[must_use]
    pub fn commits_stock_at_checkout(self) -> bool {
        match self {
            Self::Cod | Self::Wallet => true,
            Self::Gateway => false,
        }
    }

    /// Whether a pending payment on this instrument may be retried.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Gateway)
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = PaymentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::Cod),
            "wallet" => Ok(Self::Wallet),
            "gateway" | "razorpay" => Ok(Self::Gateway),
            _ => Err(PaymentParseError::UnknownMode(value.to_string())),
        }
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// No money has moved yet
    Pending,

    /// Money has been received. Terminal.
    Paid,
}

impl PaymentStatus {
    /// Persisted name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Whether money changed hands.
    #[must_use]
    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" | "success" => Ok(Self::Paid),
            other => Err(PaymentParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// Whether the order's stock has been taken out of the ledger.
#[must_use]
pub fn stock_committed(mode: PaymentMode, status: PaymentStatus) -> bool {
    mode.commits_stock_at_checkout() || status.is_paid()
}
