//! CSV Splitter Library
//!
//! Splits one CSV export into one CSV file per operator, restaurant or
//! company, optionally bundled into a single zip archive.
//!
//! # Overview
//!
//! - **Encoding fallback**: UTF-8 first, windows-1252 when UTF-8 fails or
//!   yields no usable grouping column
//! - **Column detection**: the first of the configured candidate headers
//!   present in the file is the grouping column
//! - **Partitioning**: rows are grouped by their trimmed grouping value in
//!   first-seen order; rows without a value are skipped
//! - **Output**: one CSV per group with a filesystem-safe name, plus an
//!   optional zip archive
//! - **Progress Reporting**: real-time progress updates with cancellation support
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use csv_split::{SourceFile, Splitter, SplitConfig, write_files};
//!
//! let source = SourceFile::new("vendas.csv", std::fs::read("vendas.csv")?);
//!
//! let splitter = Splitter::builder()
//!     .config(SplitConfig::default())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//!
//! let outcome = splitter.split(&source)?;
//! write_files(std::path::Path::new("outputs"), &outcome.files)?;
//! ```
//!
//! # Sessions
//!
//! [`SplitSession`] wraps a splitter with the state an upload screen needs
//! (selected file, last results, busy flags) and runs both the split and the
//! archive step on tokio's blocking pool:
//!
//! ```rust,ignore
//! let session = SplitSession::default();
//! session.select_file(source)?;
//! let outcome = session.process().await?;
//! let zip_bytes = session.build_archive().await?;
//! ```

pub mod config;
pub mod error;
pub mod grouping;
pub mod input;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod reporting;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::{
    CollisionPolicy, ConfigValidationError, DEFAULT_ARCHIVE_NAME, DEFAULT_GROUPING_CANDIDATES,
    SplitConfig, SplitConfigBuilder,
};
pub use error::{Result as SplitResult, ResultExt, SplitError};
pub use grouping::{PartitionStats, partition, partition_with_stats, resolve_grouping_column};
pub use input::{is_csv, validate_source};
pub use output::{
    build_archive, generate_files, sanitize_filename, serialize, write_archive, write_files,
};
pub use parser::parse;
pub use pipeline::{
    CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate, SplitStage,
    Splitter, SplitterBuilder,
};
pub use reporting::{GroupReport, ReportGenerator, SplitReport};
pub use session::SplitSession;
pub use types::{
    GeneratedFile, Group, ParseIssue, ParseResult, Row, SourceFile, SplitOutcome, SplitSummary,
};
