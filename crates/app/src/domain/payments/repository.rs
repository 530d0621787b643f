//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    amounts::{bind_amount, try_get_amount, try_get_parsed},
    domain::{
        orders::records::OrderUuid,
        payments::{
            data::NewPayment,
            records::{PaymentRecord, PaymentUuid},
        },
        users::UserUuid,
    },
};

const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const GET_PAYMENT_BY_ORDER_SQL: &str = include_str!("sql/get_payment_by_order.sql");
const LOCK_PAYMENT_BY_ORDER_SQL: &str = include_str!("sql/lock_payment_by_order.sql");
const LOCK_PAYMENT_BY_GATEWAY_ORDER_SQL: &str =
    include_str!("sql/lock_payment_by_gateway_order.sql");
const MARK_PAID_SQL: &str = include_str!("sql/mark_paid.sql");
const SET_GATEWAY_ORDER_SQL: &str = include_str!("sql/set_gateway_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(CREATE_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.order_uuid.into_uuid())
            .bind(payment.user_uuid.into_uuid())
            .bind(payment.payment_mode.as_str())
            .bind(bind_amount(payment.amount, "amount")?)
            .bind(payment.status.as_str())
            .bind(payment.gateway_order_id.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_by_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_BY_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_by_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(LOCK_PAYMENT_BY_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the payment a gateway order id was issued for.
    pub(crate) async fn lock_by_gateway_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        gateway_order_id: &str,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(LOCK_PAYMENT_BY_GATEWAY_ORDER_SQL)
            .bind(gateway_order_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        gateway_payment_id: Option<&str>,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(MARK_PAID_SQL)
            .bind(payment.into_uuid())
            .bind(gateway_payment_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_gateway_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        gateway_order_id: &str,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(SET_GATEWAY_ORDER_SQL)
            .bind(payment.into_uuid())
            .bind(gateway_order_id)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            payment_mode: try_get_parsed(row, "payment_mode")?,
            amount: try_get_amount(row, "amount")?,
            status: try_get_parsed(row, "status")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            gateway_payment_id: row.try_get("gateway_payment_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
