//! Main entry point for the application.
//!
//! Loads `.env` and the configuration, initializes logging, wires the
//! completion client, history store and conversation controller, then
//! either serves the HTTP API or runs the terminal chat.

use alfapilot::api::handlers::AppState;
use alfapilot::cli::{Cli, Command};
use alfapilot::config::{load_app_config, AppConfig};
use alfapilot::core::ConversationController;
use alfapilot::db::Database;
use alfapilot::errors::Error;
use alfapilot::history::SqliteHistoryStore;
use alfapilot::llm::CompletionClient;
use alfapilot::tasks::TaskService;
use alfapilot::{api, chat, utils};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

fn build_controller(config: &AppConfig) -> Result<Arc<ConversationController>, Error> {
    let database = Database::new(&config.database_path)?;
    let history = Arc::new(SqliteHistoryStore::new(database));
    let client = Arc::new(CompletionClient::new(&config.llm)?);
    Ok(Arc::new(ConversationController::new(
        TaskService::new(client),
        history,
    )))
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), Error> {
    let controller = build_controller(&config)?;
    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.api_port);
            info!("Starting API server on port {}", port);
            api::server::launch_server(port, AppState { controller }).await
        }
        Command::Chat { user_id } => chat::run_chat(controller, user_id).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();

    let config = match load_app_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let log_dir = match cli.command {
        Command::Serve { .. } => Some(config.log_dir.as_str()),
        Command::Chat { .. } => None,
    };
    utils::init_logging(&cli.logging_level, log_dir);

    if let Err(e) = dotenv {
        warn!("Failed to load .env file: {}", e);
    }

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
