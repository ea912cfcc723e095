//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crawlcraft::config::{Config, CrawlerConfig, FetcherConfig, OutputConfig, StorageFormat};
use crawlcraft::crawler::crawl;
use crawlcraft::storage::{read_records, RunStatus, SqliteSink};
use crawlcraft::CrawlError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that crawls without delays
fn create_test_config(seed: &str, storage_path: &Path, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed.to_string(),
            max_depth,
            rate_limit: 0.0,
        },
        fetcher: FetcherConfig {
            user_agent: "TestBot/1.0".to_string(),
            retry_count: 3,
            retry_delay: 0.0,
            timeout: 5,
        },
        output: OutputConfig {
            storage_path: storage_path.display().to_string(),
            format: StorageFormat::Jsonl,
            log_path: None,
        },
    }
}

fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body><h1>{}</h1><p>Content of {}</p>{}</body></html>",
            title, title, title, anchors
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(title, links))
        .mount(server)
        .await;
}

fn stored_urls(path: &Path) -> Vec<String> {
    read_records(path)
        .expect("Failed to read records")
        .into_iter()
        .map(|record| record.url)
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/page1", "page2", "/"]).await;
    mount_page(&mock_server, "/page1", "Page 1", &[]).await;
    mount_page(&mock_server, "/page2", "Page 2", &["/page1"]).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let config = create_test_config(&format!("{}/", base_url), &out, 3);

    let stats = crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_stored, 3);
    assert_eq!(stats.fetch_failures, 0);
    assert_eq!(
        stored_urls(&out),
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    let records = read_records(&out).unwrap();
    assert_eq!(records[0].title.as_deref(), Some("Home"));
    assert_eq!(records[0].headings, vec!["Home"]);
    assert_eq!(records[1].paragraphs, vec!["Content of Page 1"]);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Create a chain: / -> level1 -> level2 -> level3
    mount_page(&mock_server, "/", "Root", &["/level1"]).await;
    mount_page(&mock_server, "/level1", "Level 1", &["/level2"]).await;
    mount_page(&mock_server, "/level2", "Level 2", &["/level3"]).await;

    // Level3 should not be crawled (depth > 2)
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("Level 3", &[]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let config = create_test_config(&format!("{}/", base_url), &out, 2);

    crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(stored_urls(&out).len(), 3, "Expected exactly 3 stored pages");
}

#[tokio::test]
async fn test_retry_until_success() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/flaky"]).await;

    // Two server errors, then the real page
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html_page("Flaky", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let config = create_test_config(&format!("{}/", base_url), &out, 3);

    let stats = crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(stats.fetch_failures, 0);
    assert!(stored_urls(&out).contains(&format!("{}/flaky", base_url)));
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/gone", "/ok"]).await;
    mount_page(&mock_server, "/ok", "Ok", &[]).await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let config = create_test_config(&format!("{}/", base_url), &out, 3);

    let stats = crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(stats.fetch_failures, 1);
    assert_eq!(
        stored_urls(&out),
        vec![format!("{}/", base_url), format!("{}/ok", base_url)]
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html_page("Home", &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let config = create_test_config(&format!("{}/", mock_server.uri()), &out, 0);

    let stats = crawl(&config, "hash").await.expect("Crawl failed");
    assert_eq!(stats.pages_stored, 1);
}

#[tokio::test]
async fn test_sqlite_storage() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", &["/about"]).await;
    mount_page(&mock_server, "/about", "About", &[]).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");
    let mut config = create_test_config(&format!("{}/", base_url), &db_path, 1);
    config.output.format = StorageFormat::Sqlite;

    crawl(&config, "abc123").await.expect("Crawl failed");

    // Reopening starts a second run; the first one holds the crawl
    let storage = SqliteSink::open(&db_path, "inspect", "none").expect("Failed to open DB");
    let run = storage.get_run(1).expect("First run missing");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "abc123");
    assert_eq!(run.seed_url, format!("{}/", base_url));

    let records = storage.load_records(1).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].title.as_deref(), Some("About"));
}

#[tokio::test]
async fn test_unwritable_storage_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "Home", &[]).await;

    let dir = TempDir::new().unwrap();
    // A directory cannot be opened as the JSON Lines file
    let config = create_test_config(&format!("{}/", mock_server.uri()), dir.path(), 1);

    let result = crawl(&config, "hash").await;
    assert!(matches!(result, Err(CrawlError::SinkWrite(_))));
}

#[tokio::test]
async fn test_oversized_rate_limit_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("Home", &[]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("pages.jsonl");
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), &out, 1);
    config.crawler.rate_limit = 1e20;

    let result = crawl(&config, "hash").await;
    assert!(matches!(result, Err(CrawlError::Config(_))));
    assert!(!out.exists());
}
