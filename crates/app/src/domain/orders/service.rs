//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use settle::{
    orders::{self, OrderItemStatus, OrderStatus},
    payments::{PaymentMode, stock_committed},
};
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    amounts,
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderReversal, OrderSummary,
                OrderUuid,
            },
            repositories::{PgOrderItemsRepository, PgOrdersRepository, PgPaymentDetailsRepository},
        },
        payments::{records::PaymentRecord, repository::PgPaymentsRepository},
        products::repository::PgProductsRepository,
        users::UserUuid,
        wallets::{
            data::{self, LedgerChange},
            repository::PgWalletsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    details: PgPaymentDetailsRepository,
    payments: PgPaymentsRepository,
    products: PgProductsRepository,
    wallets: PgWalletsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            details: PgPaymentDetailsRepository::new(),
            payments: PgPaymentsRepository::new(),
            products: PgProductsRepository::new(),
            wallets: PgWalletsRepository::new(),
        }
    }

    async fn summarise(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<OrderSummary, OrdersServiceError> {
        let items = self.items.get_items(tx, order.uuid).await?;
        let payment_detail = self.details.get_detail(tx, order.uuid).await?;
        let payment = self.payments.get_by_order(tx, order.uuid).await?;

        Ok(OrderSummary {
            order,
            items,
            payment_detail,
            payment,
        })
    }

    /// Item reversals wait for an unsettled gateway payment, whose amount is fixed at checkout.
    fn check_item_reversible(
        order: &OrderRecord,
        payment: &PaymentRecord,
    ) -> Result<(), OrdersServiceError> {
        if order.payment_mode == PaymentMode::Gateway && !payment.status.is_paid() {
            return Err(OrdersServiceError::PaymentPending);
        }

        Ok(())
    }

    /// Restock and refund one item whose status has already moved, then settle the order.
    async fn reverse_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
        item: &OrderItemRecord,
        payment: &PaymentRecord,
    ) -> Result<(OrderRecord, u64, u32), OrdersServiceError> {
        let restocked = if stock_committed(order.payment_mode, payment.status) {
            self.products
                .restock(tx, item.product_uuid, item.quantity)
                .await?;

            item.quantity
        } else {
            0
        };

        let detail = self.details.get_detail(tx, order.uuid).await?;

        let (refund, remaining) = detail
            .breakdown()?
            .refund_item(amounts::to_money(item.total_price)?)?;

        self.details
            .update_detail(
                tx,
                order.uuid,
                amounts::to_minor(remaining.coupon_savings)?,
                amounts::to_minor(remaining.final_order_amount)?,
            )
            .await?;

        let refunded = if payment.status.is_paid() {
            amounts::to_minor(refund.refund)?
        } else {
            0
        };

        if refunded > 0 {
            self.wallets
                .credit(
                    tx,
                    order.user_uuid,
                    &LedgerChange {
                        amount: refunded,
                        reason: data::REFUND,
                        order: Some(order.uuid),
                    },
                )
                .await?;
        }

        let total_amount = order.total_amount.saturating_sub(item.total_price);
        let order = self.settle(tx, order, total_amount).await?;

        Ok((order, refunded, restocked))
    }

    /// Store the order's new total and move it to completed once every item is resolved.
    async fn settle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
        total_amount: u64,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let items = self.items.get_items(tx, order.uuid).await?;

        let status = match orders::resolved_order_status(items.iter().map(|item| item.status)) {
            Some(resolved) => order.status.transition_to(resolved)?,
            None => order.status,
        };

        Ok(self
            .orders
            .update_order(tx, order.uuid, status, total_amount)
            .await?)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderSummary>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_orders(&mut tx, user).await?;

        let mut summaries = Vec::with_capacity(orders.len());

        for order in orders {
            summaries.push(self.summarise(&mut tx, order).await?);
        }

        tx.commit().await?;

        Ok(summaries)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderSummary, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, user, order).await?;
        let summary = self.summarise(&mut tx, order).await?;

        tx.commit().await?;

        Ok(summary)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderReversal, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.lock_order(&mut tx, user, order).await?;
        let status = order.status.transition_to(OrderStatus::Canceled)?;

        let payment = self.payments.lock_by_order(&mut tx, order.uuid).await?;
        let committed = stock_committed(order.payment_mode, payment.status);

        let mut restocked = 0_u32;

        for item in self.items.get_items(&mut tx, order.uuid).await? {
            if item.status != OrderItemStatus::Pending {
                continue;
            }

            let next = item.status.transition_to(OrderItemStatus::Canceled)?;
            self.items.set_status(&mut tx, item.uuid, next).await?;

            if committed {
                self.products
                    .restock(&mut tx, item.product_uuid, item.quantity)
                    .await?;

                restocked = restocked.saturating_add(item.quantity);
            }
        }

        let refunded = if payment.status.is_paid() {
            order.total_amount
        } else {
            0
        };

        if refunded > 0 {
            self.wallets
                .credit(
                    &mut tx,
                    order.user_uuid,
                    &LedgerChange {
                        amount: refunded,
                        reason: data::ORDER_CANCELED,
                        order: Some(order.uuid),
                    },
                )
                .await?;
        }

        let order = self
            .orders
            .update_order(&mut tx, order.uuid, status, order.total_amount)
            .await?;

        let summary = self.summarise(&mut tx, order).await?;

        tx.commit().await?;

        info!(refunded, restocked, "canceled order");

        Ok(OrderReversal {
            summary,
            refunded,
            restocked,
        })
    }

    #[tracing::instrument(
        name = "orders.service.cancel_item",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order, item_uuid = %item),
        err
    )]
    async fn cancel_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderReversal, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.lock_order(&mut tx, user, order).await?;
        let item = self.items.lock_item(&mut tx, order.uuid, item).await?;

        let next = item.status.transition_to(OrderItemStatus::Canceled)?;

        let payment = self.payments.lock_by_order(&mut tx, order.uuid).await?;
        Self::check_item_reversible(&order, &payment)?;

        let item = self.items.set_status(&mut tx, item.uuid, next).await?;

        let (order, refunded, restocked) =
            self.reverse_item(&mut tx, order, &item, &payment).await?;

        let summary = self.summarise(&mut tx, order).await?;

        tx.commit().await?;

        info!(refunded, restocked, "canceled order item");

        Ok(OrderReversal {
            summary,
            refunded,
            restocked,
        })
    }

    #[tracing::instrument(
        name = "orders.service.return_item",
        skip(self, reason),
        fields(user_uuid = %user, order_uuid = %order, item_uuid = %item),
        err
    )]
    async fn return_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
        reason: String,
    ) -> Result<OrderReversal, OrdersServiceError> {
        let reason = reason.trim();

        if reason.is_empty() {
            return Err(OrdersServiceError::MissingReturnReason);
        }

        let now = Timestamp::now();

        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.lock_order(&mut tx, user, order).await?;
        let item = self.items.lock_item(&mut tx, order.uuid, item).await?;

        item.status.transition_to(OrderItemStatus::Returned)?;

        if !orders::return_window_open(order.created_at, now) {
            return Err(OrdersServiceError::ReturnWindowExpired);
        }

        let payment = self.payments.lock_by_order(&mut tx, order.uuid).await?;
        Self::check_item_reversible(&order, &payment)?;

        let item = self
            .items
            .mark_returned(&mut tx, item.uuid, reason, now)
            .await?;

        let (order, refunded, restocked) =
            self.reverse_item(&mut tx, order, &item, &payment).await?;

        let summary = self.summarise(&mut tx, order).await?;

        tx.commit().await?;

        info!(refunded, restocked, "returned order item");

        Ok(OrderReversal {
            summary,
            refunded,
            restocked,
        })
    }

    #[tracing::instrument(
        name = "orders.service.complete_item",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order, item_uuid = %item),
        err
    )]
    async fn complete_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderSummary, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.lock_order(&mut tx, user, order).await?;
        let item = self.items.lock_item(&mut tx, order.uuid, item).await?;

        let next = item.status.transition_to(OrderItemStatus::Completed)?;
        self.items.set_status(&mut tx, item.uuid, next).await?;

        let total_amount = order.total_amount;
        let order = self.settle(&mut tx, order, total_amount).await?;
        let summary = self.summarise(&mut tx, order).await?;

        tx.commit().await?;

        info!(order_status = %summary.order.status, "completed order item");

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderSummary>, OrdersServiceError>;

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderSummary, OrdersServiceError>;

    /// Cancel a pending order: every pending item is canceled and restocked, and a paid order's
    /// remaining total is credited back to the wallet.
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderReversal, OrdersServiceError>;

    /// Cancel one pending item and refund its share of the order.
    ///
    /// Refused with `PaymentPending` while a gateway order is still awaiting its callback.
    async fn cancel_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderReversal, OrdersServiceError>;

    /// Return one pending item within the return window.
    async fn return_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
        reason: String,
    ) -> Result<OrderReversal, OrdersServiceError>;

    /// Record delivery of one item.
    async fn complete_item(
        &self,
        user: UserUuid,
        order: OrderUuid,
        item: OrderItemUuid,
    ) -> Result<OrderSummary, OrdersServiceError>;
}
