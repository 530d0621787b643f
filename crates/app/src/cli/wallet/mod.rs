use clap::{Args, Subcommand};

mod history;

#[derive(Debug, Args)]
pub(crate) struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Debug, Subcommand)]
enum WalletSubcommand {
    History(history::WalletHistoryArgs),
}

pub(crate) async fn run(command: WalletCommand) -> Result<(), String> {
    match command.command {
        WalletSubcommand::History(args) => history::run(args).await,
    }
}
