//! Order Payment Details Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    amounts::{bind_amount, try_get_amount},
    domain::orders::{
        data::NewPaymentDetail,
        records::{OrderPaymentDetailRecord, OrderUuid},
    },
};

const CREATE_PAYMENT_DETAIL_SQL: &str = include_str!("sql/create_payment_detail.sql");
const GET_PAYMENT_DETAIL_SQL: &str = include_str!("sql/get_payment_detail.sql");
const UPDATE_PAYMENT_DETAIL_SQL: &str = include_str!("sql/update_payment_detail.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentDetailsRepository;

impl PgPaymentDetailsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        detail: &NewPaymentDetail,
    ) -> Result<OrderPaymentDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderPaymentDetailRecord>(CREATE_PAYMENT_DETAIL_SQL)
            .bind(order.into_uuid())
            .bind(bind_amount(detail.order_amount, "order_amount")?)
            .bind(bind_amount(detail.order_discount, "order_discount")?)
            .bind(detail.coupon_code.as_deref())
            .bind(bind_amount(detail.coupon_savings, "coupon_savings")?)
            .bind(bind_amount(detail.final_order_amount, "final_order_amount")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderPaymentDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderPaymentDetailRecord>(GET_PAYMENT_DETAIL_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Store what is left of the breakdown after an item reversal.
    pub(crate) async fn update_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        coupon_savings: u64,
        final_order_amount: u64,
    ) -> Result<OrderPaymentDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderPaymentDetailRecord>(UPDATE_PAYMENT_DETAIL_SQL)
            .bind(order.into_uuid())
            .bind(bind_amount(coupon_savings, "coupon_savings")?)
            .bind(bind_amount(final_order_amount, "final_order_amount")?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderPaymentDetailRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            order_amount: try_get_amount(row, "order_amount")?,
            order_discount: try_get_amount(row, "order_discount")?,
            coupon_code: row.try_get("coupon_code")?,
            coupon_savings: try_get_amount(row, "coupon_savings")?,
            final_order_amount: try_get_amount(row, "final_order_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
