//! Payments service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use settle::{
    money,
    orders::{OrderItemStatus, OrderStatus},
    signature::{self, SignatureError},
};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    database::Db,
    domain::{
        carts::repositories::PgCartsRepository,
        orders::{
            records::OrderUuid,
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        payments::{
            self,
            data::GatewayCallback,
            errors::PaymentsServiceError,
            records::{CallbackOutcome, GatewayCheckout, PaymentRecord},
            repository::PgPaymentsRepository,
        },
        products::repository::PgProductsRepository,
        users::UserUuid,
        wallets::{
            data::{self, LedgerChange},
            repository::PgWalletsRepository,
        },
    },
    gateway::{CreateGatewayOrder, PaymentGateway},
};

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    gateway: Arc<dyn PaymentGateway>,
    webhook_secret: Zeroizing<String>,
    payments: PgPaymentsRepository,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    products: PgProductsRepository,
    carts: PgCartsRepository,
    wallets: PgWalletsRepository,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, webhook_secret: Zeroizing<String>) -> Self {
        Self {
            db,
            gateway,
            webhook_secret,
            payments: PgPaymentsRepository::new(),
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            products: PgProductsRepository::new(),
            carts: PgCartsRepository::new(),
            wallets: PgWalletsRepository::new(),
        }
    }

    fn check_signature(&self, callback: &GatewayCallback) -> Result<(), PaymentsServiceError> {
        signature::verify(
            &self.webhook_secret,
            &callback.gateway_order_id,
            &callback.gateway_payment_id,
            &callback.signature,
        )
        .map_err(|error| match error {
            SignatureError::Mismatch => {
                warn!(
                    gateway_order_id = %callback.gateway_order_id,
                    gateway_payment_id = %callback.gateway_payment_id,
                    "rejected gateway callback with mismatched signature"
                );

                PaymentsServiceError::SignatureMismatch
            }
            SignatureError::InvalidKey => PaymentsServiceError::InvalidSigningKey,
        })
    }
}

impl fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn get_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, user, order).await?;
        let payment = self.payments.get_by_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(payment)
    }

    #[tracing::instrument(
        name = "payments.service.verify_callback",
        skip(self, callback),
        fields(gateway_order_id = %callback.gateway_order_id),
        err
    )]
    async fn verify_callback(
        &self,
        callback: GatewayCallback,
    ) -> Result<CallbackOutcome, PaymentsServiceError> {
        self.check_signature(&callback)?;

        let mut tx = self.db.begin_transaction().await?;

        let payment = self
            .payments
            .lock_by_gateway_order(&mut tx, &callback.gateway_order_id)
            .await?;

        if payment.status.is_paid() {
            tx.commit().await?;

            info!(payment_uuid = %payment.uuid, "ignored duplicate gateway callback");

            return Ok(CallbackOutcome::Duplicate(payment));
        }

        let order = self
            .orders
            .get_order(&mut tx, payment.user_uuid, payment.order_uuid)
            .await?;

        let payment = self
            .payments
            .mark_paid(&mut tx, payment.uuid, Some(&callback.gateway_payment_id))
            .await?;

        if order.status == OrderStatus::Canceled {
            self.wallets
                .credit(
                    &mut tx,
                    order.user_uuid,
                    &LedgerChange {
                        amount: payment.amount,
                        reason: data::ORDER_CANCELED,
                        order: Some(order.uuid),
                    },
                )
                .await?;
        } else {
            if let Some(cart) = self.carts.lock_cart(&mut tx, order.user_uuid).await? {
                self.carts.delete_cart(&mut tx, cart.uuid).await?;
            }

            let mut items = self.items.get_items(&mut tx, order.uuid).await?;

            items.retain(|item| item.status == OrderItemStatus::Pending);
            items.sort_by_key(|item| item.product_uuid);

            for item in &items {
                self.products
                    .reserve_stock(&mut tx, item.product_uuid, item.quantity)
                    .await?;
            }
        }

        tx.commit().await?;

        info!(
            payment_uuid = %payment.uuid,
            order_uuid = %order.uuid,
            amount = payment.amount,
            "applied gateway callback"
        );

        Ok(CallbackOutcome::Applied(payment))
    }

    #[tracing::instrument(
        name = "payments.service.retry_payment",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn retry_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<GatewayCheckout, PaymentsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, user, order).await?;
        let payment = self.payments.get_by_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        if payment.status.is_paid() {
            return Err(PaymentsServiceError::AlreadyPaid);
        }

        if !payment.payment_mode.is_retryable() || order.status != OrderStatus::Pending {
            return Err(PaymentsServiceError::NotRetryable);
        }

        let created = self
            .gateway
            .create_order(CreateGatewayOrder {
                amount: payment.amount,
                currency: money::CURRENCY_CODE.to_string(),
                receipt: payments::receipt(order.uuid),
            })
            .await?;

        let mut tx = self.db.begin_transaction().await?;

        let locked = self.payments.lock_by_order(&mut tx, order.uuid).await?;

        if locked.status.is_paid() {
            return Err(PaymentsServiceError::AlreadyPaid);
        }

        let payment = self
            .payments
            .set_gateway_order(&mut tx, locked.uuid, &created.id)
            .await?;

        tx.commit().await?;

        info!(gateway_order_id = %created.id, "issued retry gateway order");

        Ok(GatewayCheckout {
            gateway_order_id: created.id,
            amount: payment.amount,
            currency: created.currency,
            key_id: self.gateway.key_id(),
        })
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// The payment settling one of the user's orders.
    async fn get_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentRecord, PaymentsServiceError>;

    /// Apply a signed gateway callback. Replays of an applied callback change nothing.
    async fn verify_callback(
        &self,
        callback: GatewayCallback,
    ) -> Result<CallbackOutcome, PaymentsServiceError>;

    /// Issue a fresh gateway order for a pending gateway payment.
    async fn retry_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<GatewayCheckout, PaymentsServiceError>;
}
