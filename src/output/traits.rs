//! Output sink trait and error types
//!
//! A sink owns the collection of records gathered during a run. The crawl
//! pipeline only talks to this trait, so the snapshot-rewriting JSON store
//! could be swapped for an append-only log without touching the crawler.

use crate::output::DetailRecord;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for collected records
///
/// The collection only grows: records are kept in append order and are
/// never mutated or removed.
pub trait RecordSink {
    /// Appends a record and makes it durable before returning
    ///
    /// On error the record stays in the in-memory collection; the caller
    /// decides whether the run can continue.
    fn append(&mut self, record: DetailRecord) -> OutputResult<()>;

    /// Returns everything collected so far, in append order
    fn records(&self) -> &[DetailRecord];

    /// Performs the final write, after which the sink is closed
    fn finalize(&mut self) -> OutputResult<()>;

    /// Number of records collected so far
    fn len(&self) -> usize {
        self.records().len()
    }

    /// Returns true if nothing has been collected yet
    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
