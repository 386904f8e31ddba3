mod backend;
mod commands;
mod config;
mod db;
mod output;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::OutputFormat;
use permalink::UrlPrefix;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "permalink", version, about = "Hierarchy-derived permalinks for content records")]
struct Cli {
    /// Config profile to use
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Postgres connection string (overrides config)
    #[arg(long, global = true)]
    db: Option<String>,

    /// JSON export of the records (overrides config)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Table holding the records
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Field holding the record id
    #[arg(long, global = true)]
    id_field: Option<String>,

    /// Field holding the title a segment is built from
    #[arg(long, global = true)]
    title_field: Option<String>,

    /// Field referencing the parent record
    #[arg(long, global = true)]
    parent_field: Option<String>,

    /// Prefix for generated paths, e.g. "/", "" or "/en/"
    #[arg(long, global = true)]
    url_prefix: Option<String>,

    /// Returned when no record in the chain has a title
    #[arg(long, global = true)]
    placeholder: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Generate the permalink for one record
    Generate {
        /// Record id
        id: String,
    },

    /// List every record with its permalink
    List,

    /// Normalize free text into a path segment
    Slug {
        /// Text to normalize (joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Serve the permalink HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8055")]
        addr: String,
    },
}

impl Cli {
    fn overrides(&self) -> config::Profile {
        config::Profile {
            connection: self.db.clone(),
            records: self.records.clone(),
            collection: self.collection.clone(),
            id_field: self.id_field.clone(),
            title_field: self.title_field.clone(),
            parent_field: self.parent_field.clone(),
            url_prefix: self.url_prefix.clone().map(UrlPrefix::from),
            placeholder: self.placeholder.clone(),
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Keep one-shot commands quiet unless RUST_LOG asks otherwise.
    let default_level = match cli.command {
        CliCommand::Serve { .. } => "info",
        _ => "warn",
    };
    init_tracing(default_level);

    let overrides = cli.overrides();
    let command = match cli.command {
        CliCommand::Generate { id } => commands::Command::Generate { id },
        CliCommand::List => commands::Command::List,
        CliCommand::Slug { text } => commands::Command::Slug { text },
        CliCommand::Serve { addr } => commands::Command::Serve { addr },
    };

    if let Err(e) = commands::run(command, &cli.profile, &overrides, &cli.format).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
