//! Wallet History Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use settle_app::domain::wallets::{
    data::HistoryPage,
    records::{WalletHistoryPage, WalletHistoryRecord},
};

use crate::{extensions::*, state::State, wallet::errors::into_status_error};

/// One ledger entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletHistoryEntryResponse {
    pub uuid: Uuid,
    pub order_uuid: Option<Uuid>,

    /// `credit` or `debit`
    pub operation: String,
    pub amount: u64,

    /// Balance after this entry
    pub balance: u64,
    pub reason: String,
    pub created_at: String,
}

impl From<WalletHistoryRecord> for WalletHistoryEntryResponse {
    fn from(entry: WalletHistoryRecord) -> Self {
        Self {
            uuid: entry.uuid.into(),
            order_uuid: entry.order_uuid.map(Into::into),
            operation: entry.operation.to_string(),
            amount: entry.amount,
            balance: entry.balance,
            reason: entry.reason,
            created_at: entry.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletHistoryResponse {
    /// Newest first
    pub entries: Vec<WalletHistoryEntryResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl From<WalletHistoryPage> for WalletHistoryResponse {
    fn from(history: WalletHistoryPage) -> Self {
        Self {
            entries: history.entries.into_iter().map(Into::into).collect(),
            page: history.page,
            per_page: history.per_page,
            total: history.total,
        }
    }
}

/// Wallet History Handler
///
/// Pages through the wallet ledger. `per_page` is clamped to between 1 and 100.
#[endpoint(
    tags("wallet"),
    summary = "List Wallet History",
    responses(
        (status_code = StatusCode::OK, description = "One page of ledger entries"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<WalletHistoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let defaults = HistoryPage::default();

    let request = HistoryPage {
        page: page.into_inner().unwrap_or(defaults.page),
        per_page: per_page.into_inner().unwrap_or(defaults.per_page),
    };

    let history = state
        .app
        .wallets
        .list_history(user, request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(history.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use settle::wallet::{LedgerOperation, WalletError};
    use testresult::TestResult;

    use settle_app::domain::{
        orders::records::OrderUuid,
        wallets::{
            MockWalletsService, WalletsServiceError,
            records::{WalletHistoryUuid, WalletUuid},
        },
    };

    use crate::test_helpers::{TEST_USER_UUID, strict_app, user_service};

    use super::*;

    fn make_service(wallets: MockWalletsService) -> Service {
        let mut app = strict_app();
        app.wallets = Arc::new(wallets);

        user_service(app, Router::with_path("wallet/history").get(handler))
    }

    fn refund_entry(order: OrderUuid) -> WalletHistoryRecord {
        WalletHistoryRecord {
            uuid: WalletHistoryUuid::new(),
            wallet_uuid: WalletUuid::new(),
            user_uuid: TEST_USER_UUID,
            order_uuid: Some(order),
            operation: LedgerOperation::Credit,
            amount: 92_50,
            balance: 92_50,
            reason: "Refund".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn history_passes_paging_through() -> TestResult {
        let order = OrderUuid::new();
        let mut wallets = MockWalletsService::new();

        wallets
            .expect_list_history()
            .once()
            .withf(|user, page| *user == TEST_USER_UUID && page.page == 2 && page.per_page == 5)
            .return_once(move |_, page| {
                Ok(WalletHistoryPage {
                    entries: vec![refund_entry(order)],
                    page: page.page,
                    per_page: page.per_page,
                    total: 6,
                })
            });

        let mut res = TestClient::get("http://example.com/wallet/history?page=2&per_page=5")
            .send(&make_service(wallets))
            .await;

        let body: WalletHistoryResponse = res.take_json().await?;
        let entry = body.entries.first().ok_or("expected a history entry")?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.total, 6);
        assert_eq!(entry.operation, "credit");
        assert_eq!(entry.reason, "Refund");
        assert_eq!(entry.order_uuid, Some(order.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn paging_defaults_to_first_page_of_ten() {
        let mut wallets = MockWalletsService::new();

        wallets
            .expect_list_history()
            .once()
            .withf(|_, page| page.page == 1 && page.per_page == 10)
            .return_once(|_, page| {
                Ok(WalletHistoryPage {
                    entries: Vec::new(),
                    page: page.page,
                    per_page: page.per_page,
                    total: 0,
                })
            });

        let res = TestClient::get("http://example.com/wallet/history")
            .send(&make_service(wallets))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn diverged_ledger_returns_500() {
        let mut wallets = MockWalletsService::new();

        wallets
            .expect_list_history()
            .once()
            .return_once(|_, _| Err(WalletsServiceError::Ledger(WalletError::Diverged { position: 0 })));

        let res = TestClient::get("http://example.com/wallet/history")
            .send(&make_service(wallets))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
