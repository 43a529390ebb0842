use clap::{Parser, Subcommand};
use tracing::debug;

use lyrics_dl::cli;
use lyrics_dl::config::Config;
use lyrics_dl::error::{LyricsDlError, Result};
use lyrics_dl::services::SimpleServices;
use lyrics_dl::utils;

#[derive(Parser)]
#[command(name = "lyrics-dl")]
#[command(about = "Download song lyrics from multiple sources and translate them")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch lyrics for a song
    Fetch(cli::fetch::FetchArgs),

    /// Translate a saved lyrics file
    Translate(cli::translate::TranslateArgs),

    /// List lyrics sources and translators
    Sources(cli::sources::SourcesArgs),

    /// Show configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::init_logging(cli.verbose).map_err(LyricsDlError::Internal)?;

    let config = Config::load(cli.config.as_deref())?;
    debug!("Loaded configuration: {:?}", config.proxy_settings());

    let services = SimpleServices::new(config)?;

    match cli.command {
        Commands::Fetch(args) => cli::fetch::execute(args, &services).await,
        Commands::Translate(args) => cli::translate::execute(args, &services).await,
        Commands::Sources(args) => cli::sources::execute(args, &services).await,
        Commands::Config(args) => {
            cli::config::execute(args, &services.config(), cli.config.as_deref()).await
        }
    }
    .map_err(LyricsDlError::Internal)
}
