//! Report generation module.
//!
//! A [`SplitReport`] describes one split run: where the input came from,
//! which column was used, how many rows went where and which files were
//! produced. The same structure serves:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use csv_split::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report("vendas.csv", Some("outputs"), None, &outcome);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&report, "vendas")?;
//! ```

mod generator;

pub use generator::{GroupReport, ReportGenerator, SplitReport};
