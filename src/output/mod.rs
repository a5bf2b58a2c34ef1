//! Output module for persisting collected records
//!
//! This module handles:
//! - The `DetailRecord` output unit and its placeholder values
//! - The `RecordSink` abstraction the crawler writes through
//! - The JSON snapshot store that rewrites the output file on every append
//! - Run reports and statistics over existing output files

mod json;
mod record;
pub mod stats;
mod traits;

pub use json::{encode_snapshot, read_snapshot, write_snapshot, JsonSnapshotStore};
pub use record::{or_not_available, DetailRecord, NOT_AVAILABLE};
pub use stats::{
    compute_statistics, load_statistics, print_report, print_statistics, CrawlReport,
    OutputStatistics,
};
pub use traits::{OutputError, OutputResult, RecordSink};
