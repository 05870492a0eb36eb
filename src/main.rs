use std::io::Read;
use std::path::PathBuf;

use askrag::config::AppConfig;
use askrag::rag::RagService;
use askrag::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::info;

#[derive(Parser)]
#[command(name = "askrag")]
#[command(about = "Retrieval-augmented question answering over pasted text")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the configuration file (defaults to config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the configured host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides the configured port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Ask a question about a document from the command line
    Ask {
        /// The question to answer
        question: String,
        /// Read the document from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Print the retrieved context and sources alongside the answer
        #[arg(long)]
        show_sources: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    if cli.verbose {
        askrag::logging::init_logging_with_level("debug")?;
    } else {
        askrag::logging::init_logging_with_config(Some(&config))?;
    }

    match cli.command {
        Commands::Serve { host, port, cors } => {
            let host = host.unwrap_or_else(|| config.server_host().to_string());
            let port = port.unwrap_or(config.server_port());

            askrag::api::serve_api(&config, host, port, cors).await
        }
        Commands::Ask {
            question,
            file,
            show_sources,
        } => {
            let document = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            info!("Answering question over {} document bytes", document.len());

            let service = RagService::new(&config)?;
            let response = service.ask(&document, &question).await?;

            if show_sources {
                println!("{}", response.format());
            } else {
                println!("{}", response.answer);
            }

            Ok(())
        }
    }
}
