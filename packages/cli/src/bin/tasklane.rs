use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use tasklane_cli::config::Config;
use tasklane_security::UserStorage;

mod cli;

use cli::users::{handle_users_command, UsersCommands};

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(about = "Tasklane - task tracking REST backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen port (overrides TASKLANE_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// SQLite database file (overrides TASKLANE_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Manage user accounts
    #[command(subcommand)]
    Users(UsersCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red().bold(), e);
            process::exit(1);
        }
    };

    tasklane_cli::init_tracing(&config);

    if let Err(e) = handle_command(cli.command, config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands, mut config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                if port == 0 {
                    anyhow::bail!("Port 0 is out of valid range (1-65535)");
                }
                config.port = port;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            tasklane_cli::run_server(config).await
        }
        Commands::Users(command) => {
            let pool = tasklane_cli::open_database(&config).await?;
            let storage = UserStorage::new(pool);
            handle_users_command(command, &storage).await
        }
    }
}
