//! Crawl reports and output-file statistics
//!
//! `CrawlReport` summarizes one run as it happened. `OutputStatistics`
//! describes the content of a snapshot file, whichever run produced it.

use crate::output::json::read_snapshot;
use crate::output::{DetailRecord, OutputResult};
use crate::state::StopReason;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Summary of a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Listing pages fetched, including the one that ended the walk
    pub pages_visited: u32,

    /// Item references found across all listing pages
    pub references_discovered: u64,

    /// Records appended to the output
    pub records_saved: u64,

    /// Detail pages that could not be fetched
    pub items_failed: u64,

    /// Why pagination ended; `None` if the run aborted on an error
    pub stop_reason: Option<StopReason>,
}

impl CrawlReport {
    /// Creates a report for a run starting now
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            references_discovered: 0,
            records_saved: 0,
            items_failed: 0,
            stop_reason: None,
        }
    }

    /// Stamps the finish time and stop reason
    pub fn finish(&mut self, reason: StopReason) {
        self.finished_at = Some(Utc::now());
        self.stop_reason = Some(reason);
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Percentage of discovered items that made it into the output
    pub fn success_rate(&self) -> f64 {
        if self.references_discovered == 0 {
            return 0.0;
        }
        (self.records_saved as f64 / self.references_discovered as f64) * 100.0
    }
}

/// Prints a run report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Listing pages visited: {}", report.pages_visited);
    println!("  Items discovered: {}", report.references_discovered);
    println!("  Records saved: {}", report.records_saved);
    println!("  Items failed: {}", report.items_failed);
    match report.stop_reason {
        Some(reason) => println!("  Stopped because: {}", reason),
        None => println!("  Stopped because: error"),
    }
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} items)",
        report.success_rate(),
        report.records_saved,
        report.references_discovered
    );
}

/// Content statistics of a snapshot file
#[derive(Debug, Clone, Default)]
pub struct OutputStatistics {
    pub total_records: u64,
    pub missing_title: u64,
    pub missing_cover: u64,
    pub missing_description: u64,
    pub without_genres: u64,

    /// Genres by number of records carrying them, most common first
    pub top_genres: Vec<(String, u64)>,
}

/// Computes statistics over a set of records
pub fn compute_statistics(records: &[DetailRecord]) -> OutputStatistics {
    let mut stats = OutputStatistics::default();
    let mut genre_counts: HashMap<&str, u64> = HashMap::new();

    for record in records {
        stats.total_records += 1;
        if !record.has_title() {
            stats.missing_title += 1;
        }
        if !record.has_cover() {
            stats.missing_cover += 1;
        }
        if !record.has_description() {
            stats.missing_description += 1;
        }
        if record.genres.is_empty() {
            stats.without_genres += 1;
        }
        for genre in &record.genres {
            *genre_counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    let mut top: Vec<(String, u64)> = genre_counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    // Ties are broken by name so the listing is stable
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    stats.top_genres = top;

    stats
}

/// Loads a snapshot file and computes its statistics
pub fn load_statistics(path: &Path) -> OutputResult<OutputStatistics> {
    let records = read_snapshot(path)?;
    Ok(compute_statistics(&records))
}

/// Prints output statistics to stdout
pub fn print_statistics(stats: &OutputStatistics, top_n: usize) {
    println!("=== Output Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!();

    println!("Missing Fields:");
    for (label, count) in [
        ("title", stats.missing_title),
        ("cover_url", stats.missing_cover),
        ("description", stats.missing_description),
        ("genres", stats.without_genres),
    ] {
        let percentage = if stats.total_records > 0 {
            (count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    if !stats.top_genres.is_empty() {
        println!("Top Genres:");
        for (genre, count) in stats.top_genres.iter().take(top_n) {
            println!("  - {}: {}", genre, count);
        }
    }
}
