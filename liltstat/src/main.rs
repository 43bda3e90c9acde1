use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::{error::Result, send::SendArgs, serve::ServeArgs};

mod error;
mod observability;
mod send;
mod serve;

#[derive(Parser)]
#[command(name = "liltstat")]
#[command(about = "Liltstat beacon collector CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the beacon collector server
    Serve {
        #[clap(flatten)]
        inner: ServeArgs,
    },
    /// Send a test beacon to a running collector
    Send {
        #[clap(flatten)]
        inner: SendArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_observability();

    let cli = Cli::parse();

    let ct = CancellationToken::new();

    let ct_clone = ct.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ct_clone.cancel();
    });

    match cli.command {
        Commands::Serve { inner } => inner.run(ct).await,
        Commands::Send { inner } => inner.run(ct).await,
    }
}
