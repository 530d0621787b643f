//! Wallet ledger arithmetic.

use std::{fmt, str::FromStr};

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Wallet errors.
#[derive(Debug, Error, PartialEq)]
pub enum WalletError {
    /// Balance does not cover the debit.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Balance in minor units
        balance: i64,

        /// Requested debit in minor units
        requested: i64,
    },

    /// Ledger amounts are never negative; the operation carries the sign.
    #[error("ledger amounts must not be negative")]
    NegativeAmount,

    /// A history entry records a balance the replay did not arrive at.
    #[error("ledger diverges at entry {position}")]
    Diverged {
        /// Zero-based entry position
        position: usize,
    },

    /// Unknown stored operation name.
    #[error("unknown ledger operation {0:?}")]
    UnknownOperation(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOperation {
    /// Money into the wallet
    Credit,

    /// Money out of the wallet
    Debit,
}

impl LedgerOperation {
    /// Persisted name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerOperation {
    type Err = WalletError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(WalletError::UnknownOperation(other.to_string())),
        }
    }
}

/// One history entry: what happened and the balance it left behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry<'a> {
    /// Direction
    pub operation: LedgerOperation,

    /// Non-negative amount moved
    pub amount: Money<'a, Currency>,

    /// Balance after the entry
    pub balance: Money<'a, Currency>,
}

/// Take `amount` out of `balance`.
///
/// # Errors
///
/// Returns [`WalletError::InsufficientFunds`] when the balance does not cover the amount.
pub fn debit<'a>(
    balance: Money<'a, Currency>,
    amount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, WalletError> {
    if amount.to_minor_units() < 0 {
        return Err(WalletError::NegativeAmount);
    }

    if balance.to_minor_units() < amount.to_minor_units() {
        return Err(WalletError::InsufficientFunds {
            balance: balance.to_minor_units(),
            requested: amount.to_minor_units(),
        });
    }

    Ok(balance.sub(amount)?)
}

/// Put `amount` into `balance`.
///
/// # Errors
///
/// Returns [`WalletError::NegativeAmount`] for negative amounts.
pub fn credit<'a>(
    balance: Money<'a, Currency>,
    amount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, WalletError> {
    if amount.to_minor_units() < 0 {
        return Err(WalletError::NegativeAmount);
    }

    Ok(balance.add(amount)?)
}

/// Fold a wallet's history, in creation order, from `opening`, checking each recorded balance.
///
/// # Errors
///
/// Returns [`WalletError::Diverged`] at the first entry whose recorded balance differs from the
/// replayed one.
pub fn replay<'a, 'e, I>(
    opening: Money<'a, Currency>,
    entries: I,
) -> Result<Money<'a, Currency>, WalletError>
where
    'a: 'e,
    I: IntoIterator<Item = &'e LedgerEntry<'a>>,
{
    let mut balance = opening;

    for (position, entry) in entries.into_iter().enumerate() {
        balance = match entry.operation {
            LedgerOperation::Credit => credit(balance, entry.amount)?,
            LedgerOperation::Debit => debit(balance, entry.amount)?,
        };

        if balance.to_minor_units() != entry.balance.to_minor_units() {
            return Err(WalletError::Diverged { position });
        }
    }

    Ok(balance)
}
