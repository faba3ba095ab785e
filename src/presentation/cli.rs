//! Command-line surface of the board.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;

use crate::app_system::{BoardConfig, BoardSystem};
use crate::clients::BoardClient;
use crate::domain::{OrderSubmission, TallySummary, TOP_ITEMS};
use crate::error::BoardError;
use crate::store::UpsertKind;

use super::render;
use super::session::{run_session, Session};

#[derive(Debug, Parser)]
#[command(name = "cafe_board")]
#[command(about = "Team cafe order board", long_about = None)]
pub struct Cli {
    /// TOML file with board settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Orders file (overrides config and CAFE_BOARD_ORDERS_FILE)
    #[arg(long, global = true)]
    pub orders_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive board session on stdin/stdout
    Session,
    /// Place an order, or replace the order already under this name
    Order(OrderArgs),
    /// Delete the order at a list position (0 = most recent)
    Delete { position: usize },
    /// Show orders, most recent first
    List,
    /// Show the most ordered items
    Tally,
    /// Show counts, top items, and orders
    Status,
}

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[arg(long)]
    pub name: String,

    /// Comma-separated items, e.g. "Americano ICE, Croissant"
    #[arg(long)]
    pub items: String,

    #[arg(long, default_value = "")]
    pub note: String,
}

impl Cli {
    pub fn board_config(&self) -> Result<BoardConfig, BoardError> {
        let mut config = BoardConfig::load(self.config.as_deref())?;
        if let Some(path) = &self.orders_file {
            config.orders_file = path.clone();
        }
        Ok(config)
    }
}

pub async fn execute(cli: Cli) -> Result<(), BoardError> {
    let config = cli.board_config()?;
    let system = BoardSystem::new(&config);

    let result = run_command(&system.client, cli.command, &config).await;

    system.shutdown().await?;
    result
}

async fn run_command(
    client: &BoardClient,
    command: Commands,
    config: &BoardConfig,
) -> Result<(), BoardError> {
    match command {
        Commands::Session => {
            info!("Starting interactive session");
            let session = Session::new(client.clone(), config.roster.clone());
            run_session(session, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
                .map_err(|e| BoardError::Io(e.to_string()))
        }
        Commands::Order(args) => place_order(client, args).await,
        Commands::Delete { position } => delete_order(client, position).await,
        Commands::List => {
            print!("{}", render::render_orders(&client.list_orders().await?));
            Ok(())
        }
        Commands::Tally => {
            let summary = TallySummary::from_ranked(client.tally().await?, TOP_ITEMS);
            print!("{}", render::render_tally(&summary));
            Ok(())
        }
        Commands::Status => {
            let metrics = client.metrics().await?;
            let summary = TallySummary::from_ranked(client.tally().await?, TOP_ITEMS);
            let orders = client.list_orders().await?;
            print!("{}", render::render_board(&metrics, &summary, &orders));
            Ok(())
        }
    }
}

async fn place_order(client: &BoardClient, args: OrderArgs) -> Result<(), BoardError> {
    let report = client
        .upsert(OrderSubmission::new(args.name.trim(), args.items, args.note))
        .await?;
    match report.change {
        UpsertKind::Inserted { .. } => println!("Order placed for {}", args.name.trim()),
        UpsertKind::Updated { .. } => println!("Order updated for {}", args.name.trim()),
    }
    report.persisted
}

async fn delete_order(client: &BoardClient, position: usize) -> Result<(), BoardError> {
    let report = client.delete(position).await?;
    println!("Deleted order for {}", report.change.name);
    report.persisted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn parses_order_subcommand() {
        let cli = Cli::try_parse_from([
            "cafe_board",
            "--orders-file",
            "/tmp/o.json",
            "order",
            "--name",
            "Jun",
            "--items",
            "Tea, Scone",
        ])
        .unwrap();
        assert_eq!(cli.orders_file, Some(PathBuf::from("/tmp/o.json")));
        match cli.command {
            Commands::Order(args) => {
                assert_eq!(args.name, "Jun");
                assert_eq!(args.items, "Tea, Scone");
                assert_eq!(args.note, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn orders_file_flag_wins_over_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("board.toml");
        std::fs::write(&config_path, "orders_file = \"from_config.json\"\n").unwrap();
        let flag_path = dir.path().join("from_flag.json");

        let cli = Cli::try_parse_from([
            OsStr::new("cafe_board"),
            OsStr::new("list"),
            OsStr::new("--config"),
            config_path.as_os_str(),
            OsStr::new("--orders-file"),
            flag_path.as_os_str(),
        ])
        .unwrap();
        let config = cli.board_config().unwrap();
        assert_eq!(config.orders_file, flag_path);
    }

    #[test]
    fn delete_needs_a_number() {
        assert!(Cli::try_parse_from(["cafe_board", "delete", "last"]).is_err());
    }
}
