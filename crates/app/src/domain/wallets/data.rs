//! Wallet Data

use crate::domain::orders::records::OrderUuid;

/// Reason recorded when a wallet pays for an order.
pub const ORDER_PAYMENT: &str = "Order Payment";

/// Reason recorded when a whole order is canceled.
pub const ORDER_CANCELED: &str = "Order Canceled";

/// Reason recorded when a single item is canceled or returned.
pub const REFUND: &str = "Refund";

/// Reason recorded for the referrer's reward.
pub const REFERRAL_REWARD: &str = "Referral reward";

/// Reason recorded for the referee's bonus.
pub const REFERRAL_BONUS: &str = "Referral bonus";

/// A balance change and why it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerChange<'a> {
    pub amount: u64,
    pub reason: &'a str,
    pub order: Option<OrderUuid>,
}

/// Which page of history to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub page: u32,
    pub per_page: u32,
}

impl HistoryPage {
    pub const MAX_PER_PAGE: u32 = 100;

    /// Clamp to a 1-based page of between 1 and [`Self::MAX_PER_PAGE`] entries.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub(crate) fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}
