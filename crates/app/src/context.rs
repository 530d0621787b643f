//! App Context

use std::sync::Arc;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::{
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        coupons::{CouponsService, PgCouponsService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentsService, PgPaymentsService},
        products::{PgProductsService, ProductsService},
        wallets::{PgWalletsService, WalletsService},
    },
    gateway::{GatewayConfig, GatewayError, PaymentGateway, RazorpayGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to build payment gateway client")]
    Gateway(#[source] GatewayError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub addresses: Arc<dyn AddressesService>,
    pub coupons: Arc<dyn CouponsService>,
    pub carts: Arc<dyn CartsService>,
    pub wallets: Arc<dyn WalletsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl AppContext {
    /// Build application context from a database URL and gateway settings.
    ///
    /// Pending migrations are applied before any service is handed out.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable, a migration fails, or the gateway
    /// client cannot be built.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        gateway: GatewayConfig,
        webhook_secret: Zeroizing<String>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(RazorpayGateway::new(gateway).map_err(AppInitError::Gateway)?);

        Ok(Self::from_db(Db::new(pool), gateway, webhook_secret))
    }

    /// Wire every service over an existing pool and gateway.
    #[must_use]
    pub fn from_db(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        webhook_secret: Zeroizing<String>,
    ) -> Self {
        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            wallets: Arc::new(PgWalletsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            payments: Arc::new(PgPaymentsService::new(
                db.clone(),
                Arc::clone(&gateway),
                webhook_secret,
            )),
            checkout: Arc::new(PgCheckoutService::new(db, gateway)),
        }
    }
}
