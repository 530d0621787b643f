//! Wallets Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use settle::wallet::{self, LedgerOperation, WalletError};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    amounts::{self, bind_amount, try_get_amount, try_get_parsed},
    domain::{
        orders::records::OrderUuid,
        users::UserUuid,
        wallets::{
            data::{HistoryPage, LedgerChange},
            errors::WalletLedgerError,
            records::{WalletHistoryRecord, WalletHistoryUuid, WalletRecord, WalletUuid},
        },
    },
};

const GET_WALLET_SQL: &str = include_str!("sql/get_wallet.sql");
const LOCK_WALLET_SQL: &str = include_str!("sql/lock_wallet.sql");
const ENSURE_WALLET_SQL: &str = include_str!("sql/ensure_wallet.sql");
const SET_BALANCE_SQL: &str = include_str!("sql/set_balance.sql");
const CREATE_HISTORY_SQL: &str = include_str!("sql/create_history.sql");
const LIST_HISTORY_SQL: &str = include_str!("sql/list_history.sql");
const COUNT_HISTORY_SQL: &str = include_str!("sql/count_history.sql");
const REPLAY_HISTORY_SQL: &str = include_str!("sql/replay_history.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWalletsRepository;

impl PgWalletsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_wallet(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<WalletRecord>, sqlx::Error> {
        query_as::<Postgres, WalletRecord>(GET_WALLET_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take `change.amount` out of the user's wallet and record it.
    pub(crate) async fn debit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        change: &LedgerChange<'_>,
    ) -> Result<WalletRecord, WalletLedgerError> {
        let locked = query_as::<Postgres, WalletRecord>(LOCK_WALLET_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        let Some(wallet) = locked else {
            return Err(WalletLedgerError::InsufficientFunds {
                balance: 0,
                requested: change.amount,
            });
        };

        let balance = wallet::debit(
            amounts::to_money(wallet.balance)?,
            amounts::to_money(change.amount)?,
        )
        .map_err(|error| match error {
            WalletError::InsufficientFunds { .. } => WalletLedgerError::InsufficientFunds {
                balance: wallet.balance,
                requested: change.amount,
            },
            other => WalletLedgerError::Ledger(other),
        })?;

        self.apply(tx, &wallet, LedgerOperation::Debit, change, amounts::to_minor(balance)?)
            .await
    }

    /// Put `change.amount` into the user's wallet, opening one if needed, and record it.
    pub(crate) async fn credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        change: &LedgerChange<'_>,
    ) -> Result<WalletRecord, WalletLedgerError> {
        let wallet = query_as::<Postgres, WalletRecord>(ENSURE_WALLET_SQL)
            .bind(WalletUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let balance = wallet::credit(
            amounts::to_money(wallet.balance)?,
            amounts::to_money(change.amount)?,
        )
        .map_err(WalletLedgerError::Ledger)?;

        self.apply(tx, &wallet, LedgerOperation::Credit, change, amounts::to_minor(balance)?)
            .await
    }

    async fn apply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wallet: &WalletRecord,
        operation: LedgerOperation,
        change: &LedgerChange<'_>,
        balance: u64,
    ) -> Result<WalletRecord, WalletLedgerError> {
        let updated = query_as::<Postgres, WalletRecord>(SET_BALANCE_SQL)
            .bind(wallet.uuid.into_uuid())
            .bind(bind_amount(balance, "balance")?)
            .fetch_one(&mut **tx)
            .await?;

        query(CREATE_HISTORY_SQL)
            .bind(WalletHistoryUuid::new().into_uuid())
            .bind(wallet.uuid.into_uuid())
            .bind(wallet.user_uuid.into_uuid())
            .bind(change.order.map(OrderUuid::into_uuid))
            .bind(operation.as_str())
            .bind(bind_amount(change.amount, "amount")?)
            .bind(bind_amount(balance, "balance")?)
            .bind(change.reason)
            .execute(&mut **tx)
            .await?;

        Ok(updated)
    }

    pub(crate) async fn list_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: HistoryPage,
    ) -> Result<Vec<WalletHistoryRecord>, sqlx::Error> {
        let offset = i64::try_from(page.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, WalletHistoryRecord>(LIST_HISTORY_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(page.per_page))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_HISTORY_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    /// Every history row of a wallet, oldest first.
    pub(crate) async fn replay_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        wallet: WalletUuid,
    ) -> Result<Vec<WalletHistoryRecord>, sqlx::Error> {
        query_as::<Postgres, WalletHistoryRecord>(REPLAY_HISTORY_SQL)
            .bind(wallet.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for WalletRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WalletUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            balance: try_get_amount(row, "balance")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WalletHistoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WalletHistoryUuid::from_uuid(row.try_get("uuid")?),
            wallet_uuid: WalletUuid::from_uuid(row.try_get("wallet_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            order_uuid: row
                .try_get::<Option<Uuid>, _>("order_uuid")?
                .map(OrderUuid::from_uuid),
            operation: try_get_parsed::<LedgerOperation>(row, "operation")?,
            amount: try_get_amount(row, "amount")?,
            balance: try_get_amount(row, "balance")?,
            reason: row.try_get("reason")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
