//! Pipeline module.
//!
//! This module provides the splitter and its progress/cancellation support.

pub mod progress;
mod splitter;

pub use progress::{
    CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate, SplitStage,
};
pub use splitter::{Splitter, SplitterBuilder};
