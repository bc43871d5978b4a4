//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and run complete crawls
//! against them end-to-end.

use harvest::config::{
    Config, CrawlerConfig, ExtractConfig, FilterSection, OutputConfig, UserAgentConfig,
};
use harvest::crawler::{run_batch, Coordinator};
use harvest::output::{read_url_list, url_list_path};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(workers: usize, limit: usize, output: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers,
            limit,
            politeness_delay_ms: 0,
            fetch_timeout_secs: 5,
        },
        filter: FilterSection {
            allowed_schemes: None,
            allowed_filetypes: None,
            denylist: Some(vec!["/private".to_string()]),
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            directory: output.to_string(),
        },
        extract: ExtractConfig::default(),
    }
}

fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, at: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html_page(links))
        .mount(server)
        .await;
}

/// Serves a small site with a cycle, a denylisted link, a login link and an image
async fn small_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &["/a", "b", "/c.html#top", "/private/x", "/login", "/logo.png"],
    )
    .await;
    mount_page(&server, "/a", &["/b", "/d"]).await;
    mount_page(&server, "/b", &["/a"]).await;
    mount_page(&server, "/c.html", &["/"]).await;
    mount_page(&server, "/d", &[]).await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = small_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();

    let coordinator =
        Coordinator::new(create_test_config(4, 100, out.path().to_str().unwrap())).unwrap();
    let report = coordinator.run(&base).await.unwrap();

    let expected: Vec<String> = ["/", "/a", "/b", "/c.html", "/d"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();

    assert_eq!(report.urls, expected);
    assert_eq!(report.crawled, 5);
    assert_eq!(report.errors, 0);
    assert_eq!(report.dropped, 0);
}

#[tokio::test]
async fn test_worker_count_does_not_change_result() {
    let server = small_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();
    let dir = out.path().to_str().unwrap();

    let single = Coordinator::new(create_test_config(1, 100, dir))
        .unwrap()
        .run(&base)
        .await
        .unwrap();
    let many = Coordinator::new(create_test_config(8, 100, dir))
        .unwrap()
        .run(&base)
        .await
        .unwrap();

    assert_eq!(single.urls, many.urls);
    assert_eq!(single.crawled, many.crawled);
}

#[tokio::test]
async fn test_limit_caps_admissions() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();

    mount_page(&server, "/", &link_refs).await;
    Mock::given(method("GET"))
        .respond_with(html_page(&[]))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let coordinator =
        Coordinator::new(create_test_config(3, 5, out.path().to_str().unwrap())).unwrap();
    let report = coordinator.run(&server.uri()).await.unwrap();

    // Over-limit links are still recorded as seen, but never fetched
    assert_eq!(report.urls.len(), 21);
    assert_eq!(report.crawled, 5);
    assert_eq!(report.dropped, 16);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/moved/", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/moved/", &["child"]).await;
    mount_page(&server, "/moved/child", &[]).await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let coordinator =
        Coordinator::new(create_test_config(2, 100, out.path().to_str().unwrap())).unwrap();
    let report = coordinator.run(&format!("{}/start", base)).await.unwrap();

    assert_eq!(
        report.urls,
        vec![format!("{}/moved/child", base), format!("{}/start", base)]
    );
    assert_eq!(report.crawled, 2);
}

#[tokio::test]
async fn test_failed_pages_do_not_stall_the_crawl() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/broken", "/slow-gone", "/ok"]).await;
    mount_page(&server, "/ok", &[]).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow-gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let coordinator =
        Coordinator::new(create_test_config(2, 100, out.path().to_str().unwrap())).unwrap();
    let report = coordinator.run(&server.uri()).await.unwrap();

    assert_eq!(report.urls.len(), 4);
    assert_eq!(report.crawled, 2);
    assert_eq!(report.errors, 2);
}

#[tokio::test]
async fn test_batch_appends_per_host_file() {
    let server = small_site().await;
    let base = server.uri();
    let out = TempDir::new().unwrap();

    let mut seeds = NamedTempFile::new().unwrap();
    writeln!(seeds, "{}", base).unwrap();
    writeln!(seeds).unwrap();

    let config = create_test_config(4, 100, out.path().to_str().unwrap());
    let first = run_batch(config.clone(), seeds.path()).await.unwrap();
    let second = run_batch(config, seeds.path()).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    let file = url_list_path(out.path(), &first[0].host);
    let lines = read_url_list(&file).unwrap();

    // Two runs accumulate without deduplication
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[..5], first[0].urls[..]);
    assert_eq!(lines[5..], second[0].urls[..]);
}

#[tokio::test]
async fn test_batch_skips_malformed_seed() {
    let server = small_site().await;
    let out = TempDir::new().unwrap();

    let mut seeds = NamedTempFile::new().unwrap();
    writeln!(seeds, "not a url").unwrap();
    writeln!(seeds, "{}", server.uri()).unwrap();

    let config = create_test_config(2, 100, out.path().to_str().unwrap());
    let reports = run_batch(config, seeds.path()).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].urls.len(), 5);
}
