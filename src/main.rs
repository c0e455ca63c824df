use anyhow::Result;
use cardwatch::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the title and image read from a listing URL
    Preview { url: String },
    /// Add the card behind a listing URL to the collection
    Add {
        url: String,
        /// Use this name for price searches instead of the page title
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List saved cards and their prices
    List,
    /// Fetch fresh prices for a saved card
    Refresh {
        /// Card id, or a unique prefix of it
        id: Option<String>,
        /// Refresh every saved card
        #[arg(short, long, conflicts_with = "id")]
        all: bool,
    },
    /// Remove a saved card
    Remove { id: String },
    /// Look up prices for a card name without saving it
    Price { name: String },
}

impl From<Commands> for cardwatch::AppCommand {
    fn from(cmd: Commands) -> cardwatch::AppCommand {
        match cmd {
            Commands::Preview { url } => cardwatch::AppCommand::Preview { url },
            Commands::Add { url, name } => cardwatch::AppCommand::Add { url, name },
            Commands::List => cardwatch::AppCommand::List,
            Commands::Refresh { id, all } => cardwatch::AppCommand::Refresh { id, all },
            Commands::Remove { id } => cardwatch::AppCommand::Remove { id },
            Commands::Price { name } => cardwatch::AppCommand::Price { name },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cardwatch::cli::setup::setup(),
        Some(cmd) => cardwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
