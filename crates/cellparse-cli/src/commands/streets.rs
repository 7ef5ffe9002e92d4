//! Streets command - inspect the effective street catalog.

use clap::{Args, Subcommand};
use console::style;

use super::{load_catalog, load_config};

/// Arguments for the streets command.
#[derive(Args)]
pub struct StreetsArgs {
    #[command(subcommand)]
    command: StreetsCommand,
}

#[derive(Subcommand)]
enum StreetsCommand {
    /// List all known streets
    List,

    /// Show which street a text resolves to
    Find {
        /// Text to search
        text: String,
    },
}

pub async fn run(args: StreetsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config.catalog)?;

    match args.command {
        StreetsCommand::List => {
            let mut entries: Vec<_> = catalog.entries().iter().collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            for entry in &entries {
                println!("{}", entry);
            }
            println!();
            println!("{} {} streets", style("ℹ").blue(), entries.len());
        }
        StreetsCommand::Find { text } => match catalog.find_longest_match(&text) {
            Some(m) => {
                println!(
                    "{} {} (matched {:?} at {}..{})",
                    style("✓").green(),
                    m.entry,
                    m.span.slice(&text),
                    m.span.start,
                    m.span.end
                );
            }
            None => {
                println!("{} No known street found", style("✗").red());
            }
        },
    }

    Ok(())
}
