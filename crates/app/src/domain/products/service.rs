//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::products::{
        data::NewProduct,
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, stock = product.stock),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.reserve_stock",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn reserve_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let remaining = self
            .repository
            .reserve_stock(&mut tx, product, quantity)
            .await?;

        tx.commit().await?;

        Ok(remaining)
    }

    #[tracing::instrument(
        name = "products.service.restock",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn restock(&self, product: ProductUuid, quantity: u32) -> Result<u32, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let restocked = self.repository.restock(&mut tx, product, quantity).await?;

        tx.commit().await?;

        Ok(restocked)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Seed a product from the catalog.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Check and take `quantity` units of stock, returning what is left.
    async fn reserve_stock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, ProductsServiceError>;

    /// Return `quantity` units to stock, returning the new level.
    async fn restock(&self, product: ProductUuid, quantity: u32) -> Result<u32, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::test::TestContext;

    use super::*;

    fn new_product(stock: u32) -> NewProduct {
        NewProduct {
            uuid: ProductUuid::new(),
            name: "Linen shirt".to_string(),
            price: 100_00,
            stock,
            offer: None,
        }
    }

    #[tokio::test]
    async fn create_product_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let product = NewProduct {
            offer: Some(Percentage::from(0.125)),
            ..new_product(3)
        };

        let created = ctx.products.create_product(product.clone()).await?;

        assert_eq!(created.uuid, product.uuid);
        assert_eq!(created.price, 100_00);
        assert_eq!(created.stock, 3);
        assert_eq!(created.offer, Some(Percentage::from(0.125)));
        assert!(created.active);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reserve_stock_to_zero_hides_product() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(2)).await?;

        assert_eq!(ctx.products.reserve_stock(product.uuid, 2).await?, 0);

        let product = ctx.products.get_product(product.uuid).await?;

        assert_eq!(product.stock, 0);
        assert!(!product.active, "sold out products are delisted");

        Ok(())
    }

    #[tokio::test]
    async fn reserve_more_than_available_leaves_stock_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(1)).await?;

        let result = ctx.products.reserve_stock(product.uuid, 2).await;

        assert!(
            matches!(result, Err(ProductsServiceError::OutOfStock)),
            "expected OutOfStock, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 1);

        Ok(())
    }

    #[tokio::test]
    async fn restock_relists_sold_out_product() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(1)).await?;

        ctx.products.reserve_stock(product.uuid, 1).await?;
        ctx.products.restock(product.uuid, 3).await?;

        let product = ctx.products.get_product(product.uuid).await?;

        assert_eq!(product.stock, 3);
        assert!(product.active);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_reservations_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.products.create_product(new_product(3)).await?;

        let mut attempts = JoinSet::new();

        for _ in 0..6 {
            let products = ctx.products.clone();

            attempts.spawn(async move { products.reserve_stock(product.uuid, 1).await });
        }

        let mut reserved = 0;

        while let Some(result) = attempts.join_next().await {
            if result?.is_ok() {
                reserved += 1;
            }
        }

        assert_eq!(reserved, 3);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 0);

        Ok(())
    }
}
