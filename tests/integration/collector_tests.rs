//! Detail collection into custom sinks

use crate::support::{mount_detail, test_config, MemorySink};
use catalog_crawler::crawler::{
    CollectOutcome, DetailCollector, ListingPage, PageFetcher, SiteSelectors, StopSignal,
};
use catalog_crawler::output::{DetailRecord, OutputError, OutputResult, RecordSink};
use tempfile::TempDir;
use wiremock::MockServer;

/// Sink that refuses every record
#[derive(Default)]
struct FailingSink {
    attempts: usize,
}

impl RecordSink for FailingSink {
    fn append(&mut self, _record: DetailRecord) -> OutputResult<()> {
        self.attempts += 1;
        Err(OutputError::Write {
            path: "unwritable.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn records(&self) -> &[DetailRecord] {
        &[]
    }

    fn finalize(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

fn listing_page(server: &MockServer, references: &[&str]) -> ListingPage {
    ListingPage {
        page: 1,
        url: format!("{}/manga/", server.uri()),
        references: references.iter().map(|r| r.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_collection_grows_one_record_at_a_time() {
    let mock_server = MockServer::start().await;
    mount_detail(&mock_server, "/a", "Alpha").await;
    mount_detail(&mock_server, "/c", "Gamma").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let collector = DetailCollector::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    let mut sink = MemorySink::default();
    // "/b" is not mounted and fails with 404
    let outcome = collector
        .collect(&listing_page(&mock_server, &["/a", "/b", "/c"]), &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome, CollectOutcome { saved: 2, failed: 1 });
    assert_eq!(sink.sizes, vec![1, 2]);
    assert_eq!(sink.records[0].title, "Alpha");
    assert_eq!(sink.records[1].title, "Gamma");
    assert_eq!(sink.records[1].source_url, "/c");
}

#[tokio::test]
async fn test_absolute_references_are_fetched_as_is() {
    let mock_server = MockServer::start().await;
    mount_detail(&mock_server, "/series/alpha", "Alpha").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let collector = DetailCollector::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    let absolute = format!("{}/series/alpha", mock_server.uri());
    let mut sink = MemorySink::default();
    collector
        .collect(&listing_page(&mock_server, &[absolute.as_str()]), &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.records.len(), 1);
    assert_eq!(sink.records[0].source_url, absolute);
}

#[tokio::test]
async fn test_sink_error_ends_batch() {
    let mock_server = MockServer::start().await;
    mount_detail(&mock_server, "/a", "Alpha").await;
    mount_detail(&mock_server, "/b", "Beta").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let collector = DetailCollector::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    let mut sink = FailingSink::default();
    let result = collector
        .collect(&listing_page(&mock_server, &["/a", "/b"]), &mut sink)
        .await;

    assert!(matches!(result, Err(OutputError::Write { .. })));
    assert_eq!(sink.attempts, 1);
}

#[tokio::test]
async fn test_stopped_collector_fetches_nothing() {
    let mock_server = MockServer::start().await;
    mount_detail(&mock_server, "/a", "Alpha").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let stop = StopSignal::new();
    let collector = DetailCollector::new(&fetcher, &selectors, &config.crawler, stop.clone());
    stop.trigger();

    let mut sink = MemorySink::default();
    let outcome = collector
        .collect(&listing_page(&mock_server, &["/a"]), &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome, CollectOutcome::default());
    assert!(sink.records.is_empty());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
