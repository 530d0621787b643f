//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    amounts::{
        self, bind_amount, bind_quantity, try_get_amount, try_get_percentage, try_get_quantity,
    },
    domain::{
        carts::{
            data::NewCartItem,
            records::{CartItemRecord, CartItemUuid, CartUuid},
        },
        products::records::ProductUuid,
    },
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const GET_ITEM_QUANTITY_SQL: &str = include_str!("../sql/get_item_quantity.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const UPDATE_PRICED_ITEM_SQL: &str = include_str!("../sql/update_priced_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Quantity of `product` already in the cart, if any.
    pub(crate) async fn get_item_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let quantity: Option<i32> = query_scalar(GET_ITEM_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        quantity
            .map(|quantity| {
                u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }

    /// Set the line for `item.product_uuid` to `item.quantity`, creating it if needed.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: &NewCartItem,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.product_uuid.into_uuid())
            .bind(bind_quantity(item.quantity, "quantity")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_priced_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &CartItemRecord,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_PRICED_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(bind_amount(item.price, "price")?)
            .bind(bind_amount(item.discounted_price, "discounted_price")?)
            .bind(item.discount_percentage.as_ref().map(amounts::percent_column))
            .bind(bind_amount(item.total_price, "total_price")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_quantity(row, "quantity")?,
            price: try_get_amount(row, "price")?,
            discounted_price: try_get_amount(row, "discounted_price")?,
            discount_percentage: try_get_percentage(row, "discount_percentage")?,
            total_price: try_get_amount(row, "total_price")?,
            product_price: try_get_amount(row, "product_price")?,
            product_offer: try_get_percentage(row, "product_offer")?,
            product_stock: try_get_quantity(row, "product_stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
