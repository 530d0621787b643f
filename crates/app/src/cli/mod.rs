use clap::{Parser, Subcommand};
use settle::money;

mod coupon;
mod product;
mod wallet;

#[derive(Debug, Parser)]
#[command(name = "settle-app", about = "Settlement admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupon(coupon::CouponCommand),
    Product(product::ProductCommand),
    Wallet(wallet::WalletCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Wallet(command) => wallet::run(command).await,
        }
    }
}

/// Render a minor-unit amount in the settlement currency, e.g. `₹1,500.00`.
fn display_amount(minor: u64) -> Result<String, String> {
    let minor = i64::try_from(minor).map_err(|error| format!("amount out of range: {error}"))?;

    Ok(money::inr(minor).to_string())
}
