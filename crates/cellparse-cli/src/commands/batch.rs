//! Batch processing command for CSV files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cellparse_core::{FieldRouter, RecordFields, RecordParser};

use super::{build_router, load_config};

/// Columns appended to every output file.
const OUTPUT_COLUMNS: [&str; 3] = ["address", "phone", "other_info"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// CSV files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Header of the column holding the record text (default: from config)
    #[arg(long)]
    column: Option<String>,

    /// Output directory (default: next to each input file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of parallel workers (default: from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Keep the source text even when fields were extracted
    #[arg(long)]
    keep_source: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Drop building letters (А, Б, В, Г) from addresses
    #[arg(long)]
    strip_letters: bool,
}

/// Per-file counts.
#[derive(Debug, Default)]
struct FileStats {
    path: PathBuf,
    rows: usize,
    addresses: usize,
    phones: usize,
    other_info: usize,
    fields: usize,
    error: Option<String>,
}

impl FileStats {
    fn record(&mut self, fields: &RecordFields) {
        self.rows += 1;
        self.addresses += usize::from(fields.address.is_some());
        self.phones += usize::from(fields.phone.is_some());
        self.other_info += usize::from(fields.other_info.is_some());
        self.fields += fields.populated();
    }
}

/// Settings shared by every file in a batch.
struct BatchJob {
    router: Arc<FieldRouter>,
    column: String,
    jobs: usize,
    clear_source: bool,
    output_dir: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let router = build_router(&config, args.strip_letters)?;

    let job = BatchJob {
        router: Arc::new(router),
        column: args.column.clone().unwrap_or(config.batch.text_column.clone()),
        jobs: args.jobs.unwrap_or(config.batch.jobs).max(1),
        clear_source: config.batch.clear_source && !args.keep_source,
        output_dir: args.output_dir.clone(),
    };

    // Expand glob pattern, skipping our own outputs
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("csv") && !is_output_file(p)
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching CSV files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = job.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let row_pb = multi_progress.add(ProgressBar::new(0));
        row_pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.green/white} {pos}/{len} rows {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        match process_file(&path, &job, &row_pb).await {
            Ok(stats) => results.push(stats),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileStats {
                        path: path.clone(),
                        error: Some(error_msg),
                        ..Default::default()
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        row_pb.finish_and_clear();
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = job
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let rows: usize = results.iter().map(|r| r.rows).sum();

    println!();
    println!(
        "{} Processed {} rows in {} files in {:?}",
        style("✓").green(),
        rows,
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_output_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".parsed.csv") || n == "summary.csv")
}

async fn process_file(path: &Path, job: &BatchJob, pb: &ProgressBar) -> anyhow::Result<FileStats> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = headers
        .iter()
        .position(|h| h == job.column)
        .ok_or_else(|| {
            anyhow::anyhow!("Column '{}' not found in {}", job.column, path.display())
        })?;

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    debug!("Read {} rows from {}", rows.len(), path.display());

    pb.set_length(rows.len() as u64);
    pb.set_message(
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
    );

    let texts: Vec<String> = rows
        .iter()
        .map(|row| row.get(column).unwrap_or_default().to_string())
        .collect();
    let fields = parse_parallel(texts, job, pb).await?;

    let output_path = output_path_for(path, job.output_dir.as_deref());
    let mut wtr = csv::Writer::from_path(&output_path)?;

    let mut header: Vec<&str> = headers.iter().collect();
    header.extend(OUTPUT_COLUMNS);
    wtr.write_record(&header)?;

    let mut stats = FileStats {
        path: path.to_path_buf(),
        ..Default::default()
    };

    for (row, fields) in rows.iter().zip(&fields) {
        stats.record(fields);

        let blank_source = job.clear_source && !fields.is_empty();
        let mut record: Vec<&str> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| if i == column && blank_source { "" } else { cell })
            .collect();
        record.extend([
            fields.address.as_deref().unwrap_or_default(),
            fields.phone.as_deref().unwrap_or_default(),
            fields.other_info.as_deref().unwrap_or_default(),
        ]);
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    debug!("Wrote output to {}", output_path.display());

    Ok(stats)
}

/// Parse texts on blocking workers sharing one router, preserving row order.
async fn parse_parallel(
    texts: Vec<String>,
    job: &BatchJob,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<RecordFields>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = texts.len().div_ceil(job.jobs);
    let mut handles = Vec::new();

    for chunk in texts.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let router = Arc::clone(&job.router);
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .iter()
                .map(|text| {
                    let fields = router.parse(Some(text)).fields();
                    pb.inc(1);
                    fields
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut fields = Vec::with_capacity(texts.len());
    for handle in handles {
        fields.extend(handle.await?);
    }

    Ok(fields)
}

fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records");
    let file_name = format!("{}.parsed.csv", stem);

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn write_summary(path: &Path, results: &[FileStats]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "rows",
        "addresses",
        "phones",
        "other_info",
        "fields",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let status = if result.error.is_some() { "error" } else { "success" };

        wtr.write_record([
            filename,
            status,
            &result.rows.to_string(),
            &result.addresses.to_string(),
            &result.phones.to_string(),
            &result.other_info.to_string(),
            &result.fields.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
