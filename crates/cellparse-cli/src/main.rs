//! CLI application for splitting free-form record cells into fields.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process, streets};

/// cellparse - Split free-form Russian record text into address, phone and other info
///
/// Each record is routed in a fixed order. A 10-digit phone (with an
/// adjacent trunk "8" kept and "+7" dropped) is removed first. Then the
/// first known St Petersburg street is formatted with its type marker and
/// the house descriptor that follows it, e.g. "ул. Ключевая 14-1А-93".
/// Whatever is left, minus registration and citizenship boilerplate,
/// becomes other info. Records are parsed one by one (`process`) or as a
/// text column across CSV files (`batch`).
#[derive(Parser)]
#[command(name = "cellparse")]
#[command(author, version, about)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single record, or one record per stdin line
    Process(process::ProcessArgs),

    /// Parse a text column across CSV files
    Batch(batch::BatchArgs),

    /// Inspect the street catalog
    Streets(streets::StreetsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Streets(args) => streets::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
