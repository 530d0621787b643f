use clap::Args;
use settle_app::{
    database::{self, Db},
    domain::{
        users::UserUuid,
        wallets::{PgWalletsService, WalletsService, data::HistoryPage},
    },
};
use uuid::Uuid;

use crate::cli::display_amount;

#[derive(Debug, Args)]
pub(crate) struct WalletHistoryArgs {
    /// Wallet owner
    #[arg(long)]
    user_uuid: Uuid,

    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 20)]
    per_page: u32,

    /// Replay the history and check it lands on the stored balance
    #[arg(long)]
    reconcile: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: WalletHistoryArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgWalletsService::new(Db::new(pool));
    let user = UserUuid::from_uuid(args.user_uuid);

    let wallet = service
        .get_wallet(user)
        .await
        .map_err(|error| format!("failed to load wallet: {error}"))?;

    let history = service
        .list_history(
            user,
            HistoryPage {
                page: args.page,
                per_page: args.per_page,
            },
        )
        .await
        .map_err(|error| format!("failed to load wallet history: {error}"))?;

    println!("balance: {}", display_amount(wallet.balance)?);
    println!(
        "entries: {} (page {} of {} per page)",
        history.total, history.page, history.per_page
    );

    for entry in &history.entries {
        println!(
            "{}  {:<6}  {:>12}  {:>12}  {}",
            entry.created_at,
            entry.operation.as_str(),
            display_amount(entry.amount)?,
            display_amount(entry.balance)?,
            entry.reason,
        );
    }

    if args.reconcile {
        let replayed = service
            .reconcile(user)
            .await
            .map_err(|error| format!("wallet failed to reconcile: {error}"))?;

        println!("reconciled: {}", display_amount(replayed)?);
    }

    Ok(())
}
