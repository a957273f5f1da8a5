//! CLI entry point for the CSV splitter.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use csv_split::{
    CollisionPolicy, ReportGenerator, SourceFile, SplitConfig, SplitError, SplitOutcome,
    SplitReport, SplitSession, Splitter, write_archive, write_files,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// CLI-compatible collision policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCollisionPolicy {
    /// Append _2, _3, ... so every group keeps its own file
    Suffix,
    /// Later groups replace earlier files with the same name
    Overwrite,
}

impl From<CliCollisionPolicy> for CollisionPolicy {
    fn from(cli: CliCollisionPolicy) -> Self {
        match cli {
            CliCollisionPolicy::Suffix => CollisionPolicy::Suffix,
            CliCollisionPolicy::Overwrite => CollisionPolicy::Overwrite,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Split a CSV export into one file per operator, restaurant or company",
    long_about = "Split a CSV export into one CSV file per value of its grouping column.\n\n\
                  The grouping column is the first of 'Nome da operadora:', \
                  'Nome do restaurante:' and 'Nome da empresa:' present in the file.\n\n\
                  EXAMPLES:\n  \
                  # Write one CSV per group into ./outputs\n  \
                  csv-split -i vendas.csv\n\n  \
                  # Also bundle everything into a zip archive\n  \
                  csv-split -i vendas.csv --zip\n\n  \
                  # Preview the groups without writing anything\n  \
                  csv-split -i vendas.csv --dry-run"
)]
struct Args {
    /// Path to the CSV file to split
    #[arg(short, long)]
    input: String,

    /// Output directory for the generated files
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Also bundle the generated files into a zip archive
    #[arg(long)]
    zip: bool,

    /// Only write the zip archive, not the individual files
    #[arg(long)]
    zip_only: bool,

    /// File name of the zip archive
    #[arg(long, default_value = csv_split::DEFAULT_ARCHIVE_NAME)]
    archive_name: String,

    /// What to do when two groups map to the same file name
    #[arg(long, value_enum, default_value = "suffix")]
    collision_policy: CliCollisionPolicy,

    /// Preview the detected column and groups without writing files
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    /// Useful for piping to other tools: `... --json | jq .group_count`
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, quiet))
        .with_target(false)
        .init();
}

/// `RUST_LOG` when set (including from `.env`), otherwise the CLI level.
fn env_filter(level: &str, quiet: bool) -> EnvFilter {
    let effective_level = if quiet { "warn" } else { level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file before RUST_LOG is read
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let input_path = Path::new(&args.input);
    if !input_path.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = SplitConfig::builder()
        .output_dir(&args.output)
        .archive_name(&args.archive_name)
        .collision_policy(args.collision_policy.into())
        .write_individual_files(!args.zip_only)
        .create_archive(args.zip || args.zip_only)
        .build()?;

    let session = SplitSession::new(build_splitter(&args, config)?);

    info!("Loading {}", args.input);
    let bytes = std::fs::read(input_path)?;
    let name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(args.input.as_str())
        .to_string();
    session.select_file(SourceFile::new(name, bytes))?;

    let outcome = match session.process().await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Split failed: {}", e);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            return Err(e.into());
        }
    };

    if outcome.files.is_empty() {
        warn!(
            "No row has a value in '{}'; nothing to write",
            outcome.summary.grouping_column
        );
    }

    if args.dry_run {
        print_dry_run(&args, &outcome);
        return Ok(());
    }

    let output_dir = PathBuf::from(&args.output);
    let config = session.config();
    let mut written_dir = None;
    let mut archive_file = None;

    if config.create_archive && !outcome.files.is_empty() {
        match session.build_archive().await {
            Ok(bytes) => {
                let path = write_archive(&output_dir, &config.archive_name, &bytes)?;
                archive_file = Some(path.display().to_string());
            }
            Err(e @ SplitError::Archive(_)) if !config.write_individual_files => {
                // Fall back to individual files so the run still produces output
                warn!("{}", e);
                write_files(&output_dir, &outcome.files)?;
                written_dir = Some(args.output.clone());
            }
            Err(e) => warn!("{}", e),
        }
    }

    if config.write_individual_files {
        write_files(&output_dir, &outcome.files)?;
        written_dir = Some(args.output.clone());
    }

    let report = ReportGenerator::build_report(
        &args.input,
        written_dir.as_deref(),
        archive_file.as_deref(),
        &outcome,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let generator = ReportGenerator::new(output_dir);
        let report_path = generator.write_report_to_file(&report, &extract_file_stem(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

fn build_splitter(args: &Args, config: SplitConfig) -> Result<Splitter> {
    let mut builder = Splitter::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Show the files a real run would create.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_dry_run(args: &Args, outcome: &SplitOutcome) {
    let summary = &outcome.summary;

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of generated files");
    println!("{}\n", "=".repeat(80));

    println!("  File: {}", args.input);
    println!("  Encoding: {}", summary.encoding);
    println!("  Grouping column: {}", summary.grouping_column);
    println!(
        "  Rows: {} ({} without a group value)",
        summary.total_rows, summary.dropped_rows
    );
    println!();

    println!("{:<40} {:<30} {:>8}", "Group", "File", "Rows");
    println!("{}", "-".repeat(80));
    for file in &outcome.files {
        println!(
            "{:<40} {:<30} {:>8}",
            truncate_str(&file.group_key, 39),
            truncate_str(&file.filename, 29),
            file.row_count
        );
    }
    println!();

    for warning in &summary.warnings {
        println!("  warning: {}", warning);
    }

    println!("{}", "=".repeat(80));
    println!("To write these files to {}, run without --dry-run", args.output);
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max characters with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// Print a human-readable summary of the split.
fn print_human_readable_summary(report: &SplitReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SPLIT COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input:  {} ({})", report.input_file, report.encoding);
    if let Some(ref dir) = report.output_dir {
        println!("Output: {} ({} files)", dir, report.groups.len());
    }
    if let Some(ref archive) = report.archive_file {
        println!("Archive: {}", archive);
    }
    println!();

    println!("Grouping column: {}", report.grouping_column);
    println!("  Duration: {}ms", report.duration_ms);
    println!(
        "  Rows: {} total, {} grouped, {} skipped",
        report.total_rows, report.grouped_rows, report.dropped_rows
    );
    println!("  Groups: {}", report.group_count);
    println!();

    for group in report.groups.iter().take(10) {
        println!("  - {} ({} rows)", group.filename, group.rows);
    }
    if report.groups.len() > 10 {
        println!("  ... and {} more", report.groups.len() - 10);
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_reads_rust_log_from_env_file() {
        if std::env::var_os("RUST_LOG").is_some() {
            // An exported RUST_LOG takes precedence over .env
            return;
        }
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(&path, "RUST_LOG=csv_split=trace\n").unwrap();

        dotenv::from_path(&path).unwrap();
        assert_eq!(env_filter("info", true).to_string(), "csv_split=trace");
    }

    #[test]
    fn test_truncate_str_counts_characters() {
        assert_eq!(truncate_str("Açaí", 10), "Açaí");
        assert_eq!(truncate_str("Operadora São João", 10), "Operado...");
    }
}
