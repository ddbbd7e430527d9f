mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pdf_vault::config::{DEFAULT_STORE_DIR, ENV_STORE_DIR};
use pdf_vault::{Config, MetadataInput};

#[derive(Parser)]
#[command(name = "pdfvault")]
#[command(about = "Store PDF chunks and retrieve them by date proximity and clearance", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the index and document metadata
    #[arg(long, global = true, env = ENV_STORE_DIR, default_value = DEFAULT_STORE_DIR)]
    store_dir: PathBuf,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a file, or every supported file under a directory
    Ingest {
        path: PathBuf,
        #[arg(long, help = "Document date (ISO-8601, default: now)")]
        date: Option<String>,
        #[arg(long, help = "Version tag (default: v1.0)")]
        version_tag: Option<String>,
        #[arg(long, help = "Security tag (default: Public)")]
        security_tag: Option<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Chunks closest to a date that a clearance level may see
    Retrieve {
        date: String,
        #[arg(long, short, help = "Requester clearance (Public, Confidential, Restricted, Top Secret)")]
        clearance: Option<String>,
        #[arg(long, short, help = "Limit displayed results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Similarity search over stored chunks
    Search {
        query: String,
        #[arg(long, short, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show the metadata record of an ingested document
    Show {
        document: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show store statistics
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new(cli.store_dir);

    match cli.command {
        Commands::Ingest {
            path,
            date,
            version_tag,
            security_tag,
            json,
        } => {
            let metadata = MetadataInput {
                date,
                version_tag,
                security_tag,
            };
            commands::ingest::run(&config, &path, metadata, json)
        }
        Commands::Retrieve {
            date,
            clearance,
            limit,
            json,
        } => commands::retrieve::run(&config, &date, clearance.as_deref(), limit, json),
        Commands::Search { query, limit, json } => {
            commands::search::run(&config, &query, limit, json)
        }
        Commands::Show { document, json } => commands::show::run(&config, &document, json),
        Commands::Status { json } => commands::status::run(&config, json),
    }
}
