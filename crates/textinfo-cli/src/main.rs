//! textinfo CLI - Command-line interface
//!
//! Usage:
//!   textinfo extract <text> [--domain <domain>]
//!   textinfo spark <text>

use clap::{Parser, Subcommand};
use textinfo_core::AppConfig;
use textinfo_extract::InfoExtractor;
use textinfo_spark::SparkClient;

#[derive(Parser)]
#[command(name = "textinfo")]
#[command(about = "Chinese text information extraction CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities, keywords and relations from text
    Extract {
        /// Text to analyze
        text: String,
        /// Domain hint controlling relation extraction
        #[arg(long, default_value = textinfo_extract::DEFAULT_DOMAIN)]
        domain: String,
    },
    /// Ask the Spark model for structured information
    Spark {
        /// Text to analyze
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { text, domain } => {
            let config = AppConfig::from_env()?;
            let extractor = InfoExtractor::with_userdict(&config.dictionary.path)?;
            let extraction = extractor.extract(&text, &domain)?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Commands::Spark { text } => {
            let client = SparkClient::from_env()?;
            let info = client.extract_info(&text).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
