use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::api::AppState;
use crate::config::Config;
use crate::dashboard::TechniqueCatalog;
use crate::db::StoreAccessor;
use crate::error::DashboardError;
use crate::seed;

#[derive(Parser)]
#[command(
    name = "soc-dashboard",
    version,
    about = "SOC Dashboard: read-only security alert dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the server (default if no command specified)
    Serve,

    /// Replace every stored alert with the demo alert set
    Seed {
        /// JSON file holding an array of alert documents to load instead
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
}

impl Cli {
    pub fn handle_command_line() -> Result<(), DashboardError> {
        let args = Cli::parse();

        // Default to Serve if no command specified
        match args.command.unwrap_or(Command::Serve) {
            Command::Serve => Self::start_server(),
            Command::Seed { fixture } => Self::run_seed(fixture),
        }
    }

    fn start_server() -> Result<(), DashboardError> {
        let config = Config::get()?;
        let host = Config::get_server_host();
        let port = Config::get_server_port();

        let catalog = TechniqueCatalog::load(&config.dashboard)?;
        let state = AppState::new(StoreAccessor::new(config.database.clone()), catalog);

        info!("Starting server on {}:{}", host, port);

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| DashboardError::Error(format!("Failed to create runtime: {}", e)))?;

        rt.block_on(async {
            let web_server = crate::server::WebServer::new(host, port, state);
            web_server.start().await
        })
    }

    fn run_seed(fixture: Option<PathBuf>) -> Result<(), DashboardError> {
        let config = Config::get()?;

        let documents = match &fixture {
            Some(path) => seed::load_fixture(path)?,
            None => seed::fixture_documents()?,
        };

        let store = StoreAccessor::new(config.database.clone());
        let handle = store.get_handle()?;

        println!("Connected to '{}' at {}", handle.name(), handle.path().display());
        let counts = seed::seed_alerts(&handle, &documents)?;
        println!("Cleared {} existing alerts", counts.deleted);
        println!("Inserted {} alerts", counts.inserted);
        println!("Alerts now in store: {}", counts.total);

        Ok(())
    }
}
