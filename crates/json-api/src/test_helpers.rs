//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use settle::{
    orders::{OrderItemStatus, OrderStatus},
    payments::{PaymentMode, PaymentStatus},
};
use settle_app::{
    context::AppContext,
    domain::{
        addresses::MockAddressesService,
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartSummary, CartUuid},
        },
        checkout::MockCheckoutService,
        coupons::MockCouponsService,
        orders::{
            MockOrdersService,
            records::{
                OrderItemRecord, OrderItemUuid, OrderPaymentDetailRecord, OrderRecord,
                OrderSummary, OrderUuid, ShippingAddress,
            },
        },
        payments::{
            MockPaymentsService,
            records::{PaymentRecord, PaymentUuid},
        },
        products::{MockProductsService, records::ProductUuid},
        users::UserUuid,
        wallets::MockWalletsService,
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(0x0192_f3a4_b5c6_7d8e_9f00_1122_3344_5566));

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Context whose services have no expectations; any call the test did not set up panics.
pub(crate) fn strict_app() -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        addresses: Arc::new(MockAddressesService::new()),
        coupons: Arc::new(MockCouponsService::new()),
        carts: Arc::new(MockCartsService::new()),
        wallets: Arc::new(MockWalletsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        payments: Arc::new(MockPaymentsService::new()),
        checkout: Arc::new(MockCheckoutService::new()),
    }
}

/// Serve `route` as [`TEST_USER_UUID`].
pub(crate) fn user_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_user)
            .push(route),
    )
}

/// Serve `route` without a caller identity.
pub(crate) fn anonymous_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

pub(crate) fn make_cart_summary() -> CartSummary {
    let cart = CartUuid::from_uuid(Uuid::nil());

    CartSummary {
        cart: CartRecord {
            uuid: cart,
            user_uuid: TEST_USER_UUID,
            cart_total: 185_00,
            coupon_uuid: None,
            coupon_discount: 15_00,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        items: vec![CartItemRecord {
            uuid: CartItemUuid::from_uuid(Uuid::nil()),
            cart_uuid: cart,
            product_uuid: ProductUuid::from_uuid(Uuid::nil()),
            product_name: "Kettle".to_string(),
            quantity: 2,
            price: 100_00,
            discounted_price: 100_00,
            discount_percentage: None,
            total_price: 200_00,
            product_price: 100_00,
            product_offer: None,
            product_stock: 5,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }],
        coupon_code: Some("SAVE10".to_string()),
        subtotal: 200_00,
        product_discount: 0,
        coupon_discount: 15_00,
        payable: 185_00,
        coupon_detached: false,
    }
}

pub(crate) fn make_order_summary(order: OrderUuid, item: OrderItemUuid) -> OrderSummary {
    OrderSummary {
        order: OrderRecord {
            uuid: order,
            user_uuid: TEST_USER_UUID,
            total_amount: 185_00,
            payment_mode: PaymentMode::Wallet,
            status: OrderStatus::Pending,
            shipping: ShippingAddress {
                street: "12 MG Road".to_string(),
                city: "Kochi".to_string(),
                state: "Kerala".to_string(),
                country: "India".to_string(),
                zip: "682001".to_string(),
            },
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        items: vec![OrderItemRecord {
            uuid: item,
            order_uuid: order,
            product_uuid: ProductUuid::from_uuid(Uuid::nil()),
            quantity: 2,
            price: 100_00,
            total_price: 200_00,
            status: OrderItemStatus::Pending,
            return_reason: None,
            returned_at: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }],
        payment_detail: OrderPaymentDetailRecord {
            order_uuid: order,
            order_amount: 200_00,
            order_discount: 0,
            coupon_code: Some("SAVE10".to_string()),
            coupon_savings: 15_00,
            final_order_amount: 185_00,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        payment: make_payment(order, PaymentMode::Wallet, PaymentStatus::Paid),
    }
}

pub(crate) fn make_payment(
    order: OrderUuid,
    payment_mode: PaymentMode,
    status: PaymentStatus,
) -> PaymentRecord {
    PaymentRecord {
        uuid: PaymentUuid::from_uuid(Uuid::nil()),
        order_uuid: order,
        user_uuid: TEST_USER_UUID,
        payment_mode,
        amount: 185_00,
        status,
        gateway_order_id: (payment_mode == PaymentMode::Gateway)
            .then(|| format!("order_{order}")),
        gateway_payment_id: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
