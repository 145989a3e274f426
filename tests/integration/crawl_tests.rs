//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed to JSON files on disk.

use cinecrawl::config::Config;
use cinecrawl::crawler::run_crawl;
use cinecrawl::{CineError, Record};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(origin: &str, seed: &str, output: &Path) -> Config {
    let mut config = Config::default();
    config.site.origin = origin.to_string();
    config.site.seed = seed.to_string();
    config.crawler.probe_seed = false;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.directory = output.to_string_lossy().into_owned();
    config
}

fn movie_page(name: &str, year: u16, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">link</a>"#, l))
        .collect();
    format!(
        r#"<html><head><title>{name}</title></head><body>
        <h1 class="x-m-title">{name} <span class="muted">({year})</span></h1>
        <table>
          <tr><td>导演</td><td>Michael Mann</td></tr>
          <tr><td>类型</td><td>剧情 / 犯罪</td></tr>
          <tr><td>评分</td><td><a href="http://movie.douban.com/subject/1/">豆瓣 <span>8.6</span></a></td></tr>
        </table>
        {anchors}
        </body></html>"#
    )
}

fn listing_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">link</a></li>"#, l))
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", anchors)
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn read_record(dir: &Path, key: &str) -> Record {
    let content = std::fs::read_to_string(dir.join(format!("{}.json", key)))
        .unwrap_or_else(|e| panic!("missing record file {}: {}", key, e));
    serde_json::from_str(&content).expect("record file is valid JSON")
}

fn record_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("output directory exists")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_writes_records() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let movie_dir = output.path().join("movie");

    mount_page(
        &mock_server,
        "/category/action",
        listing_page(&["/movie/heat/", "/movie/ronin/", "/about"]),
    )
    .await;
    mount_page(&mock_server, "/movie/heat/", movie_page("Heat", 1995, &["/movie/ronin/"])).await;
    mount_page(&mock_server, "/movie/ronin/", movie_page("Ronin", 1998, &[])).await;

    let mut config = create_test_config(&mock_server.uri(), "/category/action", &movie_dir);
    config.crawler.probe_seed = true;

    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 3);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.records_written, 2);
    assert_eq!(record_files(&movie_dir), vec!["Heat.json", "Ronin.json"]);

    let heat = read_record(&movie_dir, "Heat");
    assert_eq!(heat.url, format!("{}/movie/heat/", mock_server.uri()));
    assert_eq!(heat.name, vec!["Heat"]);
    assert_eq!(heat.year, 1995);
    assert_eq!(heat.director, vec!["Michael Mann"]);
    assert_eq!(heat.category, vec!["剧情", "犯罪"]);
    assert_eq!(heat.douban.url, "http://movie.douban.com/subject/1/");
    assert_eq!(heat.douban.score, 8.6);
    assert_eq!(heat.imdb.score, 0.0);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/movie/a/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(movie_page(
            "A",
            2001,
            &["/movie/b/", "/movie/b/", "/movie/a/", "/movie/a/#top"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/movie/b/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(movie_page("B", 2002, &["/movie/a/"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "/movie/a/", output.path());
    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 2);
    assert_eq!(summary.records_written, 2);
    // Mock expectations are verified when the server drops
}

#[tokio::test]
async fn test_budget_caps_fetched_pages() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let movies: Vec<String> = (0..10).map(|i| format!("/movie/m{}/", i)).collect();
    let movie_refs: Vec<&str> = movies.iter().map(String::as_str).collect();

    mount_page(&mock_server, "/category/all", listing_page(&movie_refs)).await;
    for (i, movie) in movies.iter().enumerate() {
        mount_page(
            &mock_server,
            movie,
            movie_page(&format!("Movie {}", i), 2000, &movie_refs),
        )
        .await;
    }

    let mut config = create_test_config(&mock_server.uri(), "/category/all", output.path());
    config.crawler.max_links = 3;

    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 3);
    assert!(summary.budget_exhausted());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.len() <= 3, "fetched {} pages", requests.len());
    assert!(record_files(output.path()).len() <= 2);
}

#[tokio::test]
async fn test_failed_fetches_are_dropped() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/movie/a/",
        movie_page("A", 2001, &["/movie/missing/", "/movie/broken/", "/movie/empty/", "/movie/b/"]),
    )
    .await;
    mount_page(&mock_server, "/movie/b/", movie_page("B", 2002, &[])).await;

    Mock::given(method("GET"))
        .and(path("/movie/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/movie/empty/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;

    // /movie/missing/ has no mock, so wiremock answers 404

    let config = create_test_config(&mock_server.uri(), "/movie/a/", output.path());
    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 5);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.fetch_failures, 3);
    assert_eq!(record_files(output.path()), vec!["A.json", "B.json"]);
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let mut config = create_test_config(&mock_server.uri(), "/movie/gone/", output.path());
    config.crawler.probe_seed = true;

    let result = run_crawl(config).await;
    assert!(matches!(result, Err(CineError::SeedUnreachable { .. })));
    assert!(record_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_nameless_pages_produce_no_file() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/movie/a/",
        r#"<html><body><h1 class="x-m-title">   </h1>
           <table><tr><td>导演</td><td>Nobody</td></tr></table>
           <a href="/movie/b/">b</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/movie/b/", movie_page("B", 2002, &[])).await;

    let config = create_test_config(&mock_server.uri(), "/movie/a/", output.path());
    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.pages_without_record, 1);
    assert_eq!(record_files(output.path()), vec!["B.json"]);
}

#[tokio::test]
async fn test_filtered_links_are_not_followed() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/category/action",
        listing_page(&["/movie/foo/", "/category/region_us", "/class_tv/x", "/person/1"]),
    )
    .await;
    mount_page(&mock_server, "/movie/foo/", movie_page("Foo", 2010, &[])).await;

    for skipped in ["/category/region_us", "/class_tv/x", "/person/1"] {
        Mock::given(method("GET"))
            .and(path(skipped))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), "/category/action", output.path());
    let summary = run_crawl(config).await.expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 2);
    assert_eq!(record_files(output.path()), vec!["Foo.json"]);
}

#[tokio::test]
async fn test_crawl_terminates_on_a_cyclic_site() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/movie/a/", movie_page("A", 2001, &["/movie/b/"])).await;
    mount_page(&mock_server, "/movie/b/", movie_page("B", 2002, &["/movie/c/"])).await;
    mount_page(&mock_server, "/movie/c/", movie_page("C", 2003, &["/movie/a/"])).await;

    let mut config = create_test_config(&mock_server.uri(), "/movie/a/", output.path());
    config.crawler.concurrent_fetches = 1;
    config.crawler.queue_capacity = 1;

    let summary = tokio::time::timeout(Duration::from_secs(10), run_crawl(config))
        .await
        .expect("crawl terminates")
        .expect("crawl succeeds");

    assert_eq!(summary.links_scheduled, 3);
    assert!(!summary.budget_exhausted());
    assert_eq!(record_files(output.path()), vec!["A.json", "B.json", "C.json"]);
}
