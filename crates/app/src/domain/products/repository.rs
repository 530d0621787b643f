//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use settle::stock::{self, StockError};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    amounts::{self, bind_amount, bind_quantity, try_get_amount, try_get_percentage, try_get_quantity},
    domain::products::{
        data::NewProduct,
        errors::StockLedgerError,
        records::{ProductRecord, ProductUuid},
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LOCK_STOCK_SQL: &str = include_str!("sql/lock_stock.sql");
const SET_STOCK_SQL: &str = include_str!("sql/set_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(bind_amount(product.price, "price")?)
            .bind(bind_quantity(product.stock, "stock")?)
            .bind(product.offer.as_ref().map(amounts::percent_column))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Take `quantity` out of stock, holding the product row lock until the caller commits.
    pub(crate) async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, StockLedgerError> {
        let available = self.lock_stock(tx, product).await?;

        let remaining = stock::reserve(available, quantity).map_err(|error| match error {
            StockError::OutOfStock {
                requested,
                available,
            } => StockLedgerError::OutOfStock {
                product,
                requested,
                available,
            },
            StockError::Overflow => StockLedgerError::Overflow,
        })?;

        self.set_stock(tx, product, remaining).await?;

        Ok(remaining)
    }

    /// Put `quantity` back into stock.
    pub(crate) async fn restock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, StockLedgerError> {
        let available = self.lock_stock(tx, product).await?;

        let restocked =
            stock::restock(available, quantity).map_err(|_overflow| StockLedgerError::Overflow)?;

        self.set_stock(tx, product, restocked).await?;

        Ok(restocked)
    }

    async fn lock_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u32, StockLedgerError> {
        let stock: Option<i32> = query_scalar(LOCK_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(StockLedgerError::Sql)?;

        let stock = stock.ok_or(StockLedgerError::NotFound(product))?;

        u32::try_from(stock).map_err(|_negative| StockLedgerError::Overflow)
    }

    async fn set_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        stock: u32,
    ) -> Result<(), StockLedgerError> {
        let stock_i32 = bind_quantity(stock, "stock").map_err(StockLedgerError::Sql)?;

        query(SET_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(stock_i32)
            .bind(stock::is_listed(stock))
            .execute(&mut **tx)
            .await
            .map_err(StockLedgerError::Sql)?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_quantity(row, "stock")?,
            offer: try_get_percentage(row, "offer_percentage")?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
