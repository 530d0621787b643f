//! Order Items Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use settle::orders::OrderItemStatus;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    amounts::{bind_amount, bind_quantity, try_get_amount, try_get_parsed, try_get_quantity},
    domain::{
        orders::{
            data::NewOrderItem,
            records::{OrderItemRecord, OrderItemUuid, OrderUuid},
        },
        products::records::ProductUuid,
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const LOCK_ORDER_ITEM_SQL: &str = include_str!("sql/lock_order_item.sql");
const UPDATE_ORDER_ITEM_SQL: &str = include_str!("sql/update_order_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &NewOrderItem,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(bind_quantity(item.quantity, "quantity")?)
            .bind(bind_amount(item.price, "price")?)
            .bind(bind_amount(item.total_price, "total_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LOCK_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
        status: OrderItemStatus,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(UPDATE_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(status.as_str())
            .bind(None::<String>)
            .bind(None::<SqlxTimestamp>)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_returned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: OrderItemUuid,
        reason: &str,
        returned_at: Timestamp,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(UPDATE_ORDER_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(OrderItemStatus::Returned.as_str())
            .bind(reason)
            .bind(SqlxTimestamp::from(returned_at))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            total_price: try_get_amount(row, "total_price")?,
            status: try_get_parsed(row, "status")?,
            return_reason: row.try_get("return_reason")?,
            returned_at: row
                .try_get::<Option<SqlxTimestamp>, _>("returned_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
