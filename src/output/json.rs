//! JSON snapshot store
//!
//! Every successful append rewrites the whole output file, so the file on
//! disk is always a complete JSON array of everything collected so far.
//! Writes go to a sibling temporary file which is then renamed over the
//! target; a reader never sees a half-written document.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::output::DetailRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

/// Indentation of the pretty-printed output
const INDENT: &[u8] = b"    ";

/// Record sink that keeps a full JSON snapshot on disk
#[derive(Debug)]
pub struct JsonSnapshotStore {
    path: PathBuf,
    records: Vec<DetailRecord>,
    finalized: bool,
}

impl JsonSnapshotStore {
    /// Creates an empty store targeting `path`
    ///
    /// Nothing is written until the first append or `finalize`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            finalized: false,
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current collection to disk
    pub fn snapshot(&self) -> OutputResult<()> {
        write_snapshot(&self.path, &self.records)
    }
}

impl RecordSink for JsonSnapshotStore {
    fn append(&mut self, record: DetailRecord) -> OutputResult<()> {
        self.records.push(record);
        self.snapshot()?;
        tracing::debug!(
            "Snapshot of {} records written to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn records(&self) -> &[DetailRecord] {
        &self.records
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.snapshot()?;
        self.finalized = true;
        Ok(())
    }
}

/// An unfinalized store that holds records writes them on drop. A store that
/// never received a record leaves the file on disk alone.
impl Drop for JsonSnapshotStore {
    fn drop(&mut self) {
        if self.finalized || self.records.is_empty() {
            return;
        }
        if let Err(e) = self.snapshot() {
            tracing::warn!("Final snapshot on drop failed: {}", e);
        }
    }
}

/// Encodes records as a pretty-printed JSON array
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn encode_snapshot(records: &[DetailRecord]) -> OutputResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Atomically replaces the file at `path` with a snapshot of `records`
pub fn write_snapshot(path: &Path, records: &[DetailRecord]) -> OutputResult<()> {
    let bytes = encode_snapshot(records)?;
    let write_err = |source| OutputError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = temp_path(path);
    std::fs::write(&tmp_path, &bytes).map_err(write_err)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    Ok(())
}

/// Reads a snapshot previously written by [`write_snapshot`]
pub fn read_snapshot(path: &Path) -> OutputResult<Vec<DetailRecord>> {
    let content = std::fs::read(path).map_err(|source| OutputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_slice(&content)?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
