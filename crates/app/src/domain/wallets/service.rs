//! Wallets service.

use async_trait::async_trait;
use mockall::automock;
use settle::{
    money,
    wallet::{self, LedgerEntry, WalletError},
};
use tracing::info;

use crate::{
    amounts,
    database::Db,
    domain::{
        users::UserUuid,
        wallets::{
            REFERRAL_CREDIT,
            data::{self, HistoryPage, LedgerChange},
            errors::WalletsServiceError,
            records::{WalletBalance, WalletHistoryPage, WalletRecord},
            repository::PgWalletsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWalletsService {
    db: Db,
    repository: PgWalletsRepository,
}

impl PgWalletsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWalletsRepository::new(),
        }
    }
}

#[async_trait]
impl WalletsService for PgWalletsService {
    async fn get_wallet(&self, user: UserUuid) -> Result<WalletBalance, WalletsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let wallet = self.repository.get_wallet(&mut tx, user).await?;

        tx.commit().await?;

        Ok(WalletBalance {
            user_uuid: user,
            balance: wallet.map_or(0, |wallet| wallet.balance),
        })
    }

    async fn list_history(
        &self,
        user: UserUuid,
        page: HistoryPage,
    ) -> Result<WalletHistoryPage, WalletsServiceError> {
        let page = page.clamped();

        let mut tx = self.db.begin_transaction().await?;

        let entries = self.repository.list_history(&mut tx, user, page).await?;
        let total = self.repository.count_history(&mut tx, user).await?;

        tx.commit().await?;

        Ok(WalletHistoryPage {
            entries,
            page: page.page,
            per_page: page.per_page,
            total,
        })
    }

    #[tracing::instrument(
        name = "wallets.service.reward_referral",
        skip(self),
        fields(referrer_uuid = %referrer, referee_uuid = %referee),
        err
    )]
    async fn reward_referral(
        &self,
        referrer: UserUuid,
        referee: UserUuid,
    ) -> Result<(WalletRecord, WalletRecord), WalletsServiceError> {
        if referrer == referee {
            return Err(WalletsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let referrer_wallet = self
            .repository
            .credit(
                &mut tx,
                referrer,
                &LedgerChange {
                    amount: REFERRAL_CREDIT,
                    reason: data::REFERRAL_REWARD,
                    order: None,
                },
            )
            .await?;

        let referee_wallet = self
            .repository
            .credit(
                &mut tx,
                referee,
                &LedgerChange {
                    amount: REFERRAL_CREDIT,
                    reason: data::REFERRAL_BONUS,
                    order: None,
                },
            )
            .await?;

        tx.commit().await?;

        info!(amount = REFERRAL_CREDIT, "rewarded referral");

        Ok((referrer_wallet, referee_wallet))
    }

    #[tracing::instrument(
        name = "wallets.service.reconcile",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn reconcile(&self, user: UserUuid) -> Result<u64, WalletsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(wallet) = self.repository.get_wallet(&mut tx, user).await? else {
            return Ok(0);
        };

        let history = self.repository.replay_history(&mut tx, wallet.uuid).await?;

        tx.commit().await?;

        let entries = history
            .iter()
            .map(|entry| {
                Ok(LedgerEntry {
                    operation: entry.operation,
                    amount: amounts::to_money(entry.amount)?,
                    balance: amounts::to_money(entry.balance)?,
                })
            })
            .collect::<Result<Vec<_>, WalletsServiceError>>()?;

        let replayed = wallet::replay(money::inr(0), &entries).map_err(WalletsServiceError::Ledger)?;
        let replayed = amounts::to_minor(replayed)?;

        if replayed != wallet.balance {
            return Err(WalletsServiceError::Ledger(WalletError::Diverged {
                position: entries.len(),
            }));
        }

        Ok(replayed)
    }
}

#[automock]
#[async_trait]
pub trait WalletsService: Send + Sync {
    /// Current balance.
    async fn get_wallet(&self, user: UserUuid) -> Result<WalletBalance, WalletsServiceError>;

    /// Ledger entries, newest first.
    async fn list_history(
        &self,
        user: UserUuid,
        page: HistoryPage,
    ) -> Result<WalletHistoryPage, WalletsServiceError>;

    /// Credit both sides of a referral.
    async fn reward_referral(
        &self,
        referrer: UserUuid,
        referee: UserUuid,
    ) -> Result<(WalletRecord, WalletRecord), WalletsServiceError>;

    /// Replay the wallet's history from zero and check it lands on the stored balance.
    async fn reconcile(&self, user: UserUuid) -> Result<u64, WalletsServiceError>;
}

#[cfg(test)]
mod tests {
    use settle::wallet::LedgerOperation;
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::wallets::errors::WalletLedgerError,
        test::{TestContext, helpers::fund_wallet},
    };

    use super::*;

    #[tokio::test]
    async fn user_without_wallet_has_zero_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let wallet = ctx.wallets.get_wallet(user).await?;

        assert_eq!(wallet.balance, 0);
        assert_eq!(ctx.wallets.reconcile(user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn reward_referral_credits_both_users() -> TestResult {
        let ctx = TestContext::new().await;
        let referrer = UserUuid::new();
        let referee = UserUuid::new();

        ctx.wallets.reward_referral(referrer, referee).await?;

        assert_eq!(ctx.wallets.get_wallet(referrer).await?.balance, 100_00);
        assert_eq!(ctx.wallets.get_wallet(referee).await?.balance, 100_00);

        let history = ctx
            .wallets
            .list_history(referee, HistoryPage::default())
            .await?;

        let entry = history.entries.first().ok_or("Expected a history entry")?;

        assert_eq!(history.total, 1);
        assert_eq!(entry.operation, LedgerOperation::Credit);
        assert_eq!(entry.reason, "Referral bonus");
        assert_eq!(entry.balance, 100_00);

        Ok(())
    }

    #[tokio::test]
    async fn self_referral_is_rejected() {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let result = ctx.wallets.reward_referral(user, user).await;

        assert!(
            matches!(result, Err(WalletsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn history_pages_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let referrer = UserUuid::new();

        for _ in 0..3 {
            ctx.wallets
                .reward_referral(referrer, UserUuid::new())
                .await?;
        }

        let first = ctx
            .wallets
            .list_history(
                referrer,
                HistoryPage {
                    page: 1,
                    per_page: 2,
                },
            )
            .await?;

        let second = ctx
            .wallets
            .list_history(
                referrer,
                HistoryPage {
                    page: 2,
                    per_page: 2,
                },
            )
            .await?;

        let balances: Vec<u64> = first
            .entries
            .iter()
            .chain(&second.entries)
            .map(|entry| entry.balance)
            .collect();

        assert_eq!(first.total, 3);
        assert_eq!(balances, vec![300_00, 200_00, 100_00]);

        Ok(())
    }

    #[tokio::test]
    async fn reconcile_replays_history_to_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let referrer = UserUuid::new();

        ctx.wallets
            .reward_referral(referrer, UserUuid::new())
            .await?;
        ctx.wallets
            .reward_referral(referrer, UserUuid::new())
            .await?;

        assert_eq!(ctx.wallets.reconcile(referrer).await?, 200_00);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_debits_never_overdraw() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fund_wallet(&ctx, user, 100_00).await?;

        let mut attempts = JoinSet::new();

        for _ in 0..6 {
            let pool = ctx.db.pool().clone();

            attempts.spawn(async move {
                let mut tx = pool.begin().await?;

                PgWalletsRepository::new()
                    .debit(
                        &mut tx,
                        user,
                        &LedgerChange {
                            amount: 30_00,
                            reason: data::ORDER_PAYMENT,
                            order: None,
                        },
                    )
                    .await?;

                tx.commit().await?;

                Ok::<_, WalletLedgerError>(())
            });
        }

        let mut debited = 0;
        let mut refused = 0;

        while let Some(result) = attempts.join_next().await {
            match result? {
                Ok(()) => debited += 1,
                Err(WalletLedgerError::InsufficientFunds { .. }) => refused += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(debited, 3);
        assert_eq!(refused, 3);
        assert_eq!(ctx.wallets.get_wallet(user).await?.balance, 10_00);
        assert_eq!(ctx.wallets.reconcile(user).await?, 10_00);

        Ok(())
    }
}
