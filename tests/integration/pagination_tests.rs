//! Listing walker against a mock catalog

use crate::support::{listing_requests, mount_listing, test_config};
use catalog_crawler::crawler::{PageFetcher, PaginationWalker, SiteSelectors, StopSignal, WalkStep};
use catalog_crawler::{StopReason, WalkState};
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_walker_hands_out_pages_in_order() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, &["/a", "/b"]).await;
    mount_listing(&mock_server, 2, &["/c"]).await;
    mount_listing(&mock_server, 3, &[]).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let mut walker = PaginationWalker::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    let first = match walker.next_page().await.unwrap() {
        WalkStep::Page(page) => page,
        other => panic!("expected a page, got {:?}", other),
    };
    assert_eq!(first.page, 1);
    assert_eq!(first.url, config.crawler.base_url);
    assert_eq!(first.references, vec!["/a", "/b"]);
    assert_eq!(walker.state(), WalkState::Active { page: 2 });

    let second = match walker.next_page().await.unwrap() {
        WalkStep::Page(page) => page,
        other => panic!("expected a page, got {:?}", other),
    };
    assert_eq!(second.page, 2);
    assert_eq!(second.url, format!("{}?page=2", config.crawler.base_url));
    assert_eq!(second.references, vec!["/c"]);

    assert_eq!(
        walker.next_page().await.unwrap(),
        WalkStep::Done(StopReason::EmptyPage)
    );
    assert_eq!(walker.pages_visited(), 3);
}

#[tokio::test]
async fn test_done_walker_makes_no_more_requests() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, &[]).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let mut walker = PaginationWalker::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    assert_eq!(
        walker.next_page().await.unwrap(),
        WalkStep::Done(StopReason::EmptyPage)
    );
    assert_eq!(
        walker.next_page().await.unwrap(),
        WalkStep::Done(StopReason::EmptyPage)
    );
    assert!(walker.state().is_terminal());
    assert_eq!(listing_requests(&mock_server).await.len(), 1);
}

#[tokio::test]
async fn test_walker_stops_on_unreachable_page() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, &["/a"]).await;
    // Page 2 is not mounted and answers 404

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let mut walker = PaginationWalker::new(&fetcher, &selectors, &config.crawler, StopSignal::new());

    assert!(matches!(
        walker.next_page().await.unwrap(),
        WalkStep::Page(_)
    ));
    assert_eq!(
        walker.next_page().await.unwrap(),
        WalkStep::Done(StopReason::FetchFailed)
    );
    assert_eq!(walker.state().stop_reason(), Some(StopReason::FetchFailed));
}

#[tokio::test]
async fn test_stop_signal_cancels_walk_between_pages() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, &["/a"]).await;
    mount_listing(&mock_server, 2, &["/b"]).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, &dir.path().join("out.json"));
    let fetcher = PageFetcher::from_config(&config).unwrap();
    let selectors = SiteSelectors::from_config(&config.selectors).unwrap();
    let stop = StopSignal::new();
    let mut walker = PaginationWalker::new(&fetcher, &selectors, &config.crawler, stop.clone());

    assert!(matches!(
        walker.next_page().await.unwrap(),
        WalkStep::Page(_)
    ));
    stop.trigger();
    assert_eq!(
        walker.next_page().await.unwrap(),
        WalkStep::Done(StopReason::Cancelled)
    );
    assert_eq!(listing_requests(&mock_server).await, vec!["/manga/".to_string()]);
}
