//! Shared fixtures for the integration tests

use catalog_crawler::config::Config;
use catalog_crawler::output::{DetailRecord, OutputResult, RecordSink};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, Respond, ResponseTemplate};

pub const USER_AGENT: &str = "TestBot/1.0";

/// Matches requests without a query string
pub struct NoQuery;

impl Match for NoQuery {
    fn matches(&self, request: &Request) -> bool {
        request.url.query().is_none()
    }
}

/// Test configuration against a mock server: no pauses, short timeout
pub fn test_config(server: &MockServer, output: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = format!("{}/manga/", server.uri());
    config.crawler.listing_delay_ms = 0;
    config.crawler.detail_delay_ms = 0;
    config.crawler.request_timeout_ms = 2_000;
    config.user_agent.value = USER_AGENT.to_string();
    config.output.path = output.display().to_string();
    config
}

pub fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=UTF-8")
}

/// A listing page with one item card per reference
pub fn listing_html(references: &[&str]) -> String {
    let cards: String = references
        .iter()
        .map(|r| {
            format!(
                r#"<div class="bs"><div class="bsx"><a href="{r}" title="{r}"><div class="limit"><img src="/thumb.jpg"></div><div class="tt">{r}</div></a></div></div>"#
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Catalog</title></head><body><nav><a href="/">Home</a></nav><div class="listupd">{cards}</div></body></html>"#
    )
}

/// A detail page; `None` leaves the corresponding element out
pub fn detail_html(
    title: &str,
    cover: Option<&str>,
    description: Option<&str>,
    genres: &[&str],
) -> String {
    let cover = cover
        .map(|src| format!(r#"<div class="thumb"><img src="{src}" alt="{title}"></div>"#))
        .unwrap_or_default();
    let description = description
        .map(|text| {
            format!(r#"<div class="entry-content entry-content-single"><p>{text}</p></div>"#)
        })
        .unwrap_or_default();
    let genres: String = genres
        .iter()
        .map(|g| format!(r#"<a href="/genres/{g}" rel="tag">{g}</a>"#))
        .collect();

    format!(
        r#"<html><body><article>
            <h1 class="entry-title">{title}</h1>
            {cover}
            {description}
            <div class="seriestugenre">{genres}</div>
        </article></body></html>"#
    )
}

/// Serves listing page `page` with the given references
pub async fn mount_listing(server: &MockServer, page: u32, references: &[&str]) {
    let body = listing_html(references);
    if page == 1 {
        Mock::given(method("GET"))
            .and(path("/manga/"))
            .and(NoQuery)
            .respond_with(html_response(body))
            .mount(server)
            .await;
    } else {
        Mock::given(method("GET"))
            .and(path("/manga/"))
            .and(query_param("page", page.to_string()))
            .respond_with(html_response(body))
            .mount(server)
            .await;
    }
}

/// Serves a complete detail page at `detail_path`
pub async fn mount_detail(server: &MockServer, detail_path: &str, title: &str) {
    mount_detail_body(
        server,
        detail_path,
        detail_html(
            title,
            Some(&format!("https://cdn.example.test{detail_path}.jpg")),
            Some(&format!("About {title}.")),
            &["Action", "Fantasy"],
        ),
    )
    .await;
}

pub async fn mount_detail_body(server: &MockServer, detail_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

/// Paths of all listing page requests, in the order they were received
pub async fn listing_requests(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == "/manga/")
        .map(|r| match r.url.query() {
            Some(query) => format!("{}?{}", r.url.path(), query),
            None => r.url.path().to_string(),
        })
        .collect()
}

/// Arrival times of requests, as seen by the mock server
#[derive(Clone, Default)]
pub struct RequestLog {
    entries: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl RequestLog {
    /// Wraps `template` so every request it answers is logged first
    pub fn responder(&self, template: ResponseTemplate) -> LoggedResponse {
        LoggedResponse {
            log: self.clone(),
            template,
        }
    }

    /// Logged requests (path and query) in arrival order
    pub fn entries(&self) -> Vec<(String, Instant)> {
        self.entries.lock().unwrap().clone()
    }
}

pub struct LoggedResponse {
    log: RequestLog,
    template: ResponseTemplate,
}

impl Respond for LoggedResponse {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let target = match request.url.query() {
            Some(query) => format!("{}?{}", request.url.path(), query),
            None => request.url.path().to_string(),
        };
        self.log
            .entries
            .lock()
            .unwrap()
            .push((target, Instant::now()));
        self.template.clone()
    }
}

/// In-memory sink recording the collection size after every append
#[derive(Default)]
pub struct MemorySink {
    pub records: Vec<DetailRecord>,
    pub sizes: Vec<usize>,
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: DetailRecord) -> OutputResult<()> {
        self.records.push(record);
        self.sizes.push(self.records.len());
        Ok(())
    }

    fn records(&self) -> &[DetailRecord] {
        &self.records
    }

    fn finalize(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

pub fn sources(records: &[DetailRecord]) -> Vec<&str> {
    records.iter().map(|r| r.source_url.as_str()).collect()
}
