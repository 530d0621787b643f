//! Amount conversions between stored columns and the settlement core.
//!
//! Amounts are stored as `BIGINT` minor units, quantities as `INTEGER` and percentages as
//! `NUMERIC(5, 2)` whole percents (`12.50` for 12.5%).

use std::num::TryFromIntError;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use settle::{discounts, money};
use sqlx::{Row, postgres::PgRow};

/// Lift a stored amount into [`Money`].
///
/// # Errors
///
/// Returns an error when the amount does not fit in an `i64`.
pub(crate) fn to_money(minor: u64) -> Result<Money<'static, Currency>, TryFromIntError> {
    Ok(money::inr(i64::try_from(minor)?))
}

/// Lower [`Money`] back into a stored amount.
///
/// # Errors
///
/// Returns an error for negative amounts.
pub(crate) fn to_minor(amount: Money<'_, Currency>) -> Result<u64, TryFromIntError> {
    u64::try_from(amount.to_minor_units())
}

pub(crate) fn bind_amount(amount: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn bind_quantity(quantity: u32, column: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_percentage(row: &PgRow, column: &str) -> sqlx::Result<Option<Percentage>> {
    let value: Option<Decimal> = row.try_get(column)?;

    Ok(value.map(|percent| Percentage::from(percent / Decimal::ONE_HUNDRED)))
}

/// Whole-percent column value for a percentage.
pub(crate) fn percent_column(percent: &Percentage) -> Decimal {
    discounts::fraction(percent) * Decimal::ONE_HUNDRED
}

/// Decode a text column holding one of the core's tagged enums.
pub(crate) fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_column_round_trips_whole_percents() {
        let percent = Percentage::from(Decimal::new(125, 3));

        assert_eq!(percent_column(&percent), Decimal::new(1250, 2));
    }

    #[test]
    fn to_minor_rejects_negative_amounts() {
        assert!(to_minor(money::inr(-1)).is_err());
    }

    #[test]
    fn to_money_keeps_minor_units() -> TestResult {
        assert_eq!(to_money(185_00)?.to_minor_units(), 185_00);

        Ok(())
    }
}
