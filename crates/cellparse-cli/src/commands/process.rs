//! Process command - split records given on the command line or stdin.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use cellparse_core::{RecordFields, RecordParser};

use super::{build_router, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Record text (default: read one record per line from stdin)
    text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Drop building letters (А, Б, В, Г) from addresses
    #[arg(long)]
    strip_letters: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON, one object per record
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// One processed record.
#[derive(Serialize)]
struct ParsedRecord {
    text: String,
    #[serde(flatten)]
    fields: RecordFields,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let router = build_router(&config, args.strip_letters)?;

    let texts: Vec<String> = match &args.text {
        Some(text) => vec![text.clone()],
        None => io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect(),
    };

    if texts.is_empty() {
        anyhow::bail!("No input records. Pass TEXT or pipe records on stdin.");
    }

    info!("Processing {} records", texts.len());

    let records: Vec<ParsedRecord> = texts
        .into_iter()
        .map(|text| {
            let fields = router.parse(Some(&text)).fields();
            ParsedRecord { text, fields }
        })
        .collect();

    let output = match args.format {
        OutputFormat::Json => format_json(&records)?,
        OutputFormat::Csv => format_csv(&records)?,
        OutputFormat::Text => format_text(&records),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Processed {} records in {:?}", records.len(), start.elapsed());

    Ok(())
}

fn format_json(records: &[ParsedRecord]) -> anyhow::Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

fn format_csv(records: &[ParsedRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["text", "address", "phone", "other_info"])?;

    for record in records {
        wtr.write_record([
            record.text.as_str(),
            record.fields.address.as_deref().unwrap_or_default(),
            record.fields.phone.as_deref().unwrap_or_default(),
            record.fields.other_info.as_deref().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[ParsedRecord]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("Record: {}\n", record.text));
        output.push_str(&format!(
            "  Address: {}\n",
            record.fields.address.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "  Phone:   {}\n",
            record.fields.phone.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "  Other:   {}\n",
            record.fields.other_info.as_deref().unwrap_or("-")
        ));
    }

    output
}
