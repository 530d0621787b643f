use decimal_percentage::Percentage;
use jiff::{SignedDuration, Timestamp};
use settle::{
    payments::PaymentMode,
    signature::{self, SignatureError},
};

use crate::{
    domain::{
        addresses::{
            AddressesService, AddressesServiceError,
            data::NewAddress,
            records::{AddressRecord, AddressUuid},
        },
        carts::{
            CartsService, CartsServiceError,
            data::NewCartItem,
            records::{CartItemUuid, CartSummary},
        },
        checkout::{CheckoutService, data::PlaceOrder},
        coupons::{
            CouponsService, CouponsServiceError,
            data::NewCoupon,
            records::{CouponRecord, CouponUuid},
        },
        orders::records::{OrderSummary, OrderUuid},
        payments::{data::GatewayCallback, records::GatewayCheckout},
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::UserUuid,
        wallets::{data::LedgerChange, repository::PgWalletsRepository},
    },
    test::{TestContext, WEBHOOK_SECRET},
};

pub(crate) fn new_address() -> NewAddress {
    NewAddress {
        uuid: AddressUuid::new(),
        street: "12 MG Road".to_string(),
        city: "Kochi".to_string(),
        state: "Kerala".to_string(),
        country: "India".to_string(),
        zip: "682001".to_string(),
    }
}

pub(crate) async fn create_address(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<AddressRecord, AddressesServiceError> {
    ctx.addresses.create_address(user, new_address()).await
}

/// 10% off orders of at least 150.00, capped at 15.00.
pub(crate) fn new_coupon(code: &str) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        discount: Percentage::from(0.10),
        min_purchase_amount: 150_00,
        max_discount_amount: 15_00,
        max_usage: 100,
        expires_at: Timestamp::now() + SignedDuration::from_hours(24 * 7),
    }
}

pub(crate) async fn create_coupon(
    ctx: &TestContext,
    code: &str,
) -> Result<CouponRecord, CouponsServiceError> {
    ctx.coupons.create_coupon(new_coupon(code)).await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    stock: u32,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: format!("Product {price}"),
            price,
            stock,
            offer: None,
        })
        .await
}

pub(crate) async fn create_product_with_offer(
    ctx: &TestContext,
    price: u64,
    offer: Percentage,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: format!("Offer product {price}"),
            price,
            stock: 10,
            offer: Some(offer),
        })
        .await
}

pub(crate) async fn add_to_cart(
    ctx: &TestContext,
    user: UserUuid,
    product: ProductUuid,
    quantity: u32,
) -> Result<CartSummary, CartsServiceError> {
    ctx.carts
        .add_item(
            user,
            NewCartItem {
                uuid: CartItemUuid::new(),
                product_uuid: product,
                quantity,
            },
        )
        .await
}

/// Credit `amount` straight into the user's wallet.
pub(crate) async fn fund_wallet(
    ctx: &TestContext,
    user: UserUuid,
    amount: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = ctx.db.pool().begin().await?;

    PgWalletsRepository::new()
        .credit(
            &mut tx,
            user,
            &LedgerChange {
                amount,
                reason: "Test funding",
                order: None,
            },
        )
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Check out the user's cart to a freshly created address.
pub(crate) async fn place_order(
    ctx: &TestContext,
    user: UserUuid,
    payment_mode: PaymentMode,
) -> Result<OrderSummary, Box<dyn std::error::Error>> {
    let address = create_address(ctx, user).await?;

    let placed = ctx
        .checkout
        .place_order(
            user,
            PlaceOrder {
                address: address.uuid,
                payment_mode,
            },
        )
        .await?;

    Ok(placed.summary)
}

/// Check out through the gateway, returning the order and its gateway checkout.
pub(crate) async fn place_gateway_order(
    ctx: &TestContext,
    user: UserUuid,
) -> Result<(OrderSummary, GatewayCheckout), Box<dyn std::error::Error>> {
    let address = create_address(ctx, user).await?;

    let placed = ctx
        .checkout
        .place_order(
            user,
            PlaceOrder {
                address: address.uuid,
                payment_mode: PaymentMode::Gateway,
            },
        )
        .await?;

    let checkout = placed.gateway.ok_or("Expected a gateway checkout")?;

    Ok((placed.summary, checkout))
}

/// Callback as the gateway would post it for `gateway_order_id`.
pub(crate) fn sign_callback(
    gateway_order_id: &str,
    gateway_payment_id: &str,
) -> Result<GatewayCallback, SignatureError> {
    Ok(GatewayCallback {
        gateway_order_id: gateway_order_id.to_string(),
        gateway_payment_id: gateway_payment_id.to_string(),
        signature: signature::sign(WEBHOOK_SECRET, gateway_order_id, gateway_payment_id)?,
    })
}

/// Move an order's creation time `days` into the past.
pub(crate) async fn age_order(
    ctx: &TestContext,
    order: OrderUuid,
    days: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET created_at = created_at - make_interval(days => $2) WHERE uuid = $1",
    )
        .bind(order.into_uuid())
        .bind(days)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
