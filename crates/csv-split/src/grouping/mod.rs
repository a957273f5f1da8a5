//! Grouping-column detection and row partitioning.

mod partitioner;
mod resolver;

pub use partitioner::{PartitionStats, partition, partition_with_stats};
pub use resolver::resolve_grouping_column;
