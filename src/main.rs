mod domain;
mod error;
mod store;
mod messages;
mod clients;
mod board_actor;

mod app_system;
mod presentation;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::error;

use crate::app_system::setup_tracing;
use crate::presentation::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup tracing once for the entire application
    setup_tracing();

    if let Err(e) = cli::execute(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
