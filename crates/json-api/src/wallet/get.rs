//! Get Wallet Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use settle_app::domain::wallets::records::WalletBalance;

use crate::{extensions::*, state::State, wallet::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletResponse {
    pub user_uuid: Uuid,

    /// In paise
    pub balance: u64,
}

impl From<WalletBalance> for WalletResponse {
    fn from(wallet: WalletBalance) -> Self {
        Self {
            user_uuid: wallet.user_uuid.into(),
            balance: wallet.balance,
        }
    }
}

/// Get Wallet Handler
#[endpoint(
    tags("wallet"),
    summary = "Get Wallet Balance",
    responses(
        (status_code = StatusCode::OK, description = "Current balance"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<WalletResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let wallet = state
        .app
        .wallets
        .get_wallet(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(wallet.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use settle_app::domain::wallets::MockWalletsService;

    use crate::test_helpers::{TEST_USER_UUID, strict_app, user_service};

    use super::*;

    #[tokio::test]
    async fn get_wallet_returns_balance() -> TestResult {
        let mut wallets = MockWalletsService::new();

        wallets
            .expect_get_wallet()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|user| {
                Ok(WalletBalance {
                    user_uuid: user,
                    balance: 250_00,
                })
            });

        let mut app = strict_app();
        app.wallets = Arc::new(wallets);

        let mut res = TestClient::get("http://example.com/wallet")
            .send(&user_service(app, Router::with_path("wallet").get(handler)))
            .await;

        let body: WalletResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.user_uuid, TEST_USER_UUID.into_uuid());
        assert_eq!(body.balance, 250_00);

        Ok(())
    }
}
