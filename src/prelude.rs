//! Settle prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coupons::{CouponUnavailable, check_availability},
    discounts::DiscountError,
    money::{CURRENCY, CURRENCY_CODE, inr},
    orders::{OrderItemStatus, OrderStatus, RETURN_WINDOW, StatusError, return_window_open},
    payments::{PaymentMode, PaymentParseError, PaymentStatus, stock_committed},
    pricing::{
        CartLine, CouponTerms, LineQuantityError, MAX_QUANTITY_PER_PRODUCT, PricedLine,
        PricingError, PricingSnapshot, check_line_quantity, price_cart,
    },
    refunds::{ItemRefund, PaymentBreakdown, RefundError},
    signature::SignatureError,
    stock::StockError,
    wallet::{LedgerEntry, LedgerOperation, WalletError},
};
