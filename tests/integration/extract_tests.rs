//! Integration tests for the article text stage
//!
//! Pages are served by wiremock; extracted files land in a temporary
//! directory.

use harvest::config::{
    Config, CrawlerConfig, ExtractConfig, FilterSection, OutputConfig, UserAgentConfig,
};
use harvest::crawler::build_http_client;
use harvest::extract::{article_file_name, extract_urls, run_extraction};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SENTENCE: &str = "The council said that it would not be able to finish the plan before \
    the end of the year, because most of the money that they had asked for was still not there.";

fn create_test_config(texts: &str, min_length: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 1,
            limit: 10,
            politeness_delay_ms: 0,
            fetch_timeout_secs: 5,
        },
        filter: FilterSection::default(),
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            directory: "./out".to_string(),
        },
        extract: ExtractConfig {
            workers: 3,
            min_length,
            output_directory: texts.to_string(),
            stopwords: None,
        },
    }
}

/// An article page with `paragraphs` copies of the sentence plus navigation
fn article(paragraphs: usize) -> ResponseTemplate {
    let body: String = (0..paragraphs)
        .map(|_| format!("<p>{}</p>", SENTENCE))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!(
            r#"<html><head><script>var x = 1;</script></head><body>
            <ul><li><a href="/">Home</a></li><li><a href="/about">About</a></li></ul>
            {}
            </body></html>"#,
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn serve_articles(server: &MockServer) {
    for (at, paragraphs) in [("/short", 3), ("/medium", 14), ("/long", 17)] {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(article(paragraphs))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_only_long_articles_are_written() {
    let server = MockServer::start().await;
    serve_articles(&server).await;
    let base = server.uri();
    let texts = TempDir::new().unwrap();

    let config = create_test_config(texts.path().to_str().unwrap(), 2000);
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let urls: Vec<String> = ["/short", "/medium", "/long"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();

    let summary = extract_urls(&client, &config, urls.clone()).await.unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.too_short, 1);
    assert_eq!(summary.failed, 0);

    assert!(!texts.path().join(article_file_name(&urls[0])).exists());
    for url in &urls[1..] {
        let text = std::fs::read_to_string(texts.path().join(article_file_name(url))).unwrap();
        assert!(text.chars().count() > 2000);
        assert!(!text.contains("Home"));
        assert!(!text.contains("var x"));
    }
}

#[tokio::test]
async fn test_failed_fetch_does_not_abort_batch() {
    let server = MockServer::start().await;
    serve_articles(&server).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let texts = TempDir::new().unwrap();
    let config = create_test_config(texts.path().to_str().unwrap(), 2000);
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let urls = vec![
        format!("{}/gone", server.uri()),
        format!("{}/long", server.uri()),
    ];

    let summary = extract_urls(&client, &config, urls).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_run_extraction_reads_url_file() {
    let server = MockServer::start().await;
    serve_articles(&server).await;
    let texts = TempDir::new().unwrap();

    let mut list = NamedTempFile::new().unwrap();
    writeln!(list, "{}/short", server.uri()).unwrap();
    writeln!(list).unwrap();
    writeln!(list, "{}/long", server.uri()).unwrap();

    // The output directory is created on demand
    let nested = texts.path().join("nested");
    let config = create_test_config(nested.to_str().unwrap(), 2000);
    let summary = run_extraction(&config, list.path()).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.written, 1);
    assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 1);
}

#[tokio::test]
async fn test_rerun_overwrites_same_file() {
    let server = MockServer::start().await;
    serve_articles(&server).await;
    let texts = TempDir::new().unwrap();

    let config = create_test_config(texts.path().to_str().unwrap(), 100);
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let urls = vec![format!("{}/medium", server.uri())];

    extract_urls(&client, &config, urls.clone()).await.unwrap();
    extract_urls(&client, &config, urls).await.unwrap();

    assert_eq!(std::fs::read_dir(texts.path()).unwrap().count(), 1);
}
