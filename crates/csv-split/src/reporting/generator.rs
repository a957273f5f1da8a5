use crate::error::{Result, ResultExt};
use crate::types::SplitOutcome;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Report of one split run, for CLI and library output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Directory the CSV files were saved into (if written)
    pub output_dir: Option<String>,
    /// Path to the zip archive (if written)
    pub archive_file: Option<String>,

    // Run summary
    pub encoding: String,
    pub grouping_column: String,
    pub total_rows: usize,
    pub grouped_rows: usize,
    /// Rows skipped because their grouping value was empty
    pub dropped_rows: usize,
    pub group_count: usize,

    /// One entry per generated file, in output order
    pub groups: Vec<GroupReport>,
    /// Parser diagnostics that did not stop the run
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

/// One generated file in a [`SplitReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub key: String,
    pub filename: String,
    pub rows: usize,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Build a report from a split outcome.
    pub fn build_report(
        input_file: &str,
        output_dir: Option<&str>,
        archive_file: Option<&str>,
        outcome: &SplitOutcome,
    ) -> SplitReport {
        let summary = &outcome.summary;

        let groups = outcome
            .files
            .iter()
            .map(|file| GroupReport {
                key: file.group_key.clone(),
                filename: file.filename.clone(),
                rows: file.row_count,
            })
            .collect();

        SplitReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_dir: output_dir.map(String::from),
            archive_file: archive_file.map(String::from),
            encoding: summary.encoding.clone(),
            grouping_column: summary.grouping_column.clone(),
            total_rows: summary.total_rows,
            grouped_rows: summary.grouped_rows,
            dropped_rows: summary.dropped_rows,
            group_count: summary.group_count,
            groups,
            warnings: summary.warnings.clone(),
            duration_ms: summary.duration_ms,
        }
    }

    /// Write a report to a JSON file.
    ///
    /// If `report_base_name` is "vendas", the file will be "vendas_report.json".
    pub fn write_report_to_file(
        &self,
        report: &SplitReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
