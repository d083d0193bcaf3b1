//! leafcheck CLI - talk to a running leafcheck server

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

mod error;
mod http;
mod output;

use http::ApiClient;

/// leafcheck - plant-leaf disease prediction client
///
/// Examples:
///   leafcheck ping                      # Is the server up?
///   leafcheck predict leaf.jpg          # Classify an image
///   leafcheck predict leaf.jpg -l hi    # ... with Hindi metadata
///   leafcheck classes                   # Classes the model predicts
#[derive(Parser)]
#[command(
    name = "leafcheck",
    about = "Plant-leaf disease prediction client",
    version = env!("CARGO_PKG_VERSION"),
    arg_required_else_help = true,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server URL
    #[arg(
        long,
        global = true,
        value_name = "URL",
        default_value = "http://localhost:8000",
        env = "LEAFCHECK_SERVER"
    )]
    pub server: String,

    /// Output format
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "table"
    )]
    pub output_format: OutputFormat,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "60", value_name = "SECONDS")]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the server is alive
    Ping,

    /// Classify a leaf image
    ///
    /// Uploads the image and prints the predicted class, its confidence
    /// and, when the server has metadata, causes, precautions and cures.
    #[command(alias = "classify")]
    Predict {
        /// Image file (JPEG, PNG, ...)
        image: PathBuf,

        /// Language for the metadata lists
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// List the classes the model predicts, in output order
    Classes,

    /// Show the metadata languages the server knows
    Languages,

    /// Show backend and metadata status
    #[command(alias = "status")]
    Health,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("leafcheck_cli=debug"))
            .init();
    }

    let client = ApiClient::new(&cli.server, Duration::from_secs(cli.timeout))?;
    let format = cli.output_format;

    let rendered = match cli.command {
        Commands::Ping => client.ping().await?,

        Commands::Predict { image, lang } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let prediction = client.predict(bytes, file_name, lang.as_deref()).await?;
            output::prediction(&prediction, format)
        }

        Commands::Classes => output::classes(&client.classes().await?, format),

        Commands::Languages => output::languages(&client.languages().await?, format),

        Commands::Health => output::health(&client.health().await?, format),
    };

    println!("{}", rendered.trim_end());
    Ok(())
}
