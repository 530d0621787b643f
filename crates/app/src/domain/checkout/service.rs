//! Checkout service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use settle::{
    money,
    payments::{PaymentMode, PaymentStatus},
    pricing::{self, LineQuantityError},
    refunds::PaymentBreakdown,
};
use smallvec::SmallVec;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    amounts,
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::{
            records::CartItemRecord,
            repositories::PgCartsRepository,
            snapshot::{CartPricer, PricedCart},
        },
        checkout::{data::PlaceOrder, errors::CheckoutServiceError, records::PlacedOrder},
        coupons::repository::PgCouponsRepository,
        orders::{
            data::{NewOrder, NewOrderItem, NewPaymentDetail},
            records::{OrderItemUuid, OrderSummary, OrderUuid, ShippingAddress},
            repositories::{PgOrderItemsRepository, PgOrdersRepository, PgPaymentDetailsRepository},
        },
        payments::{
            self,
            data::NewPayment,
            records::{GatewayCheckout, PaymentUuid},
            repository::PgPaymentsRepository,
        },
        products::repository::PgProductsRepository,
        users::UserUuid,
        wallets::{
            data::{self, LedgerChange},
            repository::PgWalletsRepository,
        },
    },
    gateway::{CreateGatewayOrder, GatewayOrder, PaymentGateway},
};

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    gateway: Arc<dyn PaymentGateway>,
    carts: PgCartsRepository,
    pricer: CartPricer,
    addresses: PgAddressesRepository,
    coupons: PgCouponsRepository,
    products: PgProductsRepository,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    details: PgPaymentDetailsRepository,
    payments: PgPaymentsRepository,
    wallets: PgWalletsRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            gateway,
            carts: PgCartsRepository::new(),
            pricer: CartPricer::new(),
            addresses: PgAddressesRepository::new(),
            coupons: PgCouponsRepository::new(),
            products: PgProductsRepository::new(),
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            details: PgPaymentDetailsRepository::new(),
            payments: PgPaymentsRepository::new(),
            wallets: PgWalletsRepository::new(),
        }
    }

    /// Lock and price the user's cart, failing when there is nothing to check out.
    async fn price_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<PricedCart, CheckoutServiceError> {
        let cart = self
            .carts
            .lock_cart(tx, user)
            .await?
            .ok_or(CheckoutServiceError::EmptyCart)?;

        let priced = self.pricer.reprice::<CheckoutServiceError>(tx, cart).await?;

        if priced.summary.items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        Ok(priced)
    }

    /// Payable amount the gateway order has to be created for.
    async fn quote(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<u64, CheckoutServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let priced = self.price_cart(&mut tx, user).await?;

        self.addresses
            .get_address(&mut tx, user, request.address)
            .await?;

        tx.commit().await?;

        Ok(priced.summary.payable)
    }

    /// Take every line out of stock, locking products in a stable order.
    async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[CartItemRecord],
    ) -> Result<(), CheckoutServiceError> {
        let mut lines: SmallVec<[&CartItemRecord; 8]> = items.iter().collect();

        lines.sort_by_key(|item| item.product_uuid);

        for item in lines {
            self.products
                .reserve_stock(tx, item.product_uuid, item.quantity)
                .await?;
        }

        Ok(())
    }
}

impl fmt::Debug for PgCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgCheckoutService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.place_order",
        skip(self, request),
        fields(user_uuid = %user, payment_mode = %request.payment_mode),
        err
    )]
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<PlacedOrder, CheckoutServiceError> {
        let order_uuid = OrderUuid::new();

        let gateway_order = match request.payment_mode {
            PaymentMode::Gateway => {
                let amount = self.quote(user, request).await?;

                Some(
                    self.gateway
                        .create_order(CreateGatewayOrder {
                            amount,
                            currency: money::CURRENCY_CODE.to_string(),
                            receipt: payments::receipt(order_uuid),
                        })
                        .await?,
                )
            }
            PaymentMode::Cod | PaymentMode::Wallet => None,
        };

        let mut tx = self.db.begin_transaction().await?;

        let priced = self.price_cart(&mut tx, user).await?;
        let payable = priced.summary.payable;

        if gateway_order
            .as_ref()
            .is_some_and(|gateway_order| gateway_order.amount != payable)
        {
            return Err(CheckoutServiceError::CartChanged);
        }

        let address = self
            .addresses
            .get_address(&mut tx, user, request.address)
            .await?;

        for item in &priced.summary.items {
            pricing::check_line_quantity(item.quantity, item.product_stock).map_err(
                |error| match error {
                    LineQuantityError::Zero => CheckoutServiceError::InvalidData,
                    LineQuantityError::CapExceeded { cap, .. } => {
                        CheckoutServiceError::QuantityCapExceeded {
                            product: item.product_uuid,
                            cap,
                        }
                    }
                    LineQuantityError::OutOfStock {
                        requested,
                        available,
                    } => CheckoutServiceError::OutOfStock {
                        product: item.product_uuid,
                        requested,
                        available,
                    },
                },
            )?;
        }

        if let Some(coupon) = &priced.coupon {
            let coupon = self.coupons.lock_coupon(&mut tx, coupon.uuid).await?;

            coupon.check_available(Timestamp::now())?;

            self.coupons.record_usage(&mut tx, coupon.uuid).await?;
        }

        let order = self
            .orders
            .create_order(
                &mut tx,
                &NewOrder {
                    uuid: order_uuid,
                    user_uuid: user,
                    total_amount: payable,
                    payment_mode: request.payment_mode,
                    shipping: ShippingAddress {
                        street: address.street,
                        city: address.city,
                        state: address.state,
                        country: address.country,
                        zip: address.zip,
                    },
                },
            )
            .await?;

        let mut items = Vec::with_capacity(priced.summary.items.len());

        for item in &priced.summary.items {
            let created = self
                .items
                .create_item(
                    &mut tx,
                    order.uuid,
                    &NewOrderItem {
                        uuid: OrderItemUuid::new(),
                        product_uuid: item.product_uuid,
                        quantity: item.quantity,
                        price: item.discounted_price,
                        total_price: item.total_price,
                    },
                )
                .await?;

            items.push(created);
        }

        let breakdown = PaymentBreakdown::from_snapshot(&priced.snapshot)
            .map_err(|_mismatch| CheckoutServiceError::InvalidData)?;

        let payment_detail = self
            .details
            .create_detail(
                &mut tx,
                order.uuid,
                &NewPaymentDetail {
                    order_amount: amounts::to_minor(breakdown.order_amount)?,
                    order_discount: amounts::to_minor(breakdown.order_discount)?,
                    coupon_code: priced.summary.coupon_code.clone(),
                    coupon_savings: amounts::to_minor(breakdown.coupon_savings)?,
                    final_order_amount: amounts::to_minor(breakdown.final_order_amount)?,
                },
            )
            .await?;

        let status = match request.payment_mode {
            PaymentMode::Wallet => {
                if payable > 0 {
                    self.wallets
                        .debit(
                            &mut tx,
                            user,
                            &LedgerChange {
                                amount: payable,
                                reason: data::ORDER_PAYMENT,
                                order: Some(order.uuid),
                            },
                        )
                        .await?;
                }

                PaymentStatus::Paid
            }
            PaymentMode::Cod | PaymentMode::Gateway => PaymentStatus::Pending,
        };

        let payment = self
            .payments
            .create_payment(
                &mut tx,
                &NewPayment {
                    uuid: PaymentUuid::new(),
                    order_uuid: order.uuid,
                    user_uuid: user,
                    payment_mode: request.payment_mode,
                    amount: payable,
                    status,
                    gateway_order_id: gateway_order.as_ref().map(|created| created.id.clone()),
                },
            )
            .await?;

        if request.payment_mode.commits_stock_at_checkout() {
            self.reserve_stock(&mut tx, &priced.summary.items).await?;
            self.carts.delete_cart(&mut tx, priced.summary.cart.uuid).await?;
        }

        tx.commit().await?;

        info!(
            order_uuid = %order.uuid,
            total_amount = payable,
            payment_status = %payment.status,
            "placed order"
        );

        let gateway = gateway_order.map(|GatewayOrder { id, amount, currency }| GatewayCheckout {
            gateway_order_id: id,
            amount,
            currency,
            key_id: self.gateway.key_id(),
        });

        Ok(PlacedOrder {
            summary: OrderSummary {
                order,
                items,
                payment_detail,
                payment,
            },
            gateway,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Place an order from the user's cart and settle it with the requested instrument.
    ///
    /// Nothing is persisted unless the whole checkout succeeds.
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<PlacedOrder, CheckoutServiceError>;
}
