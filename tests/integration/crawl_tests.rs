//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site on 127.0.0.1 and run the
//! full crawl cycle end-to-end against it.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::time::Duration;
use tempfile::TempDir;
use trawler::config::{Config, CrawlerConfig};
use trawler::output::{read_results, CsvSink, ResultSink};
use trawler::{run_crawl, Crawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config(max_pages: usize, use_sitemap: bool) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages,
            politeness_delay: 0,
            page_timeout: 5,
            document_timeout: 5,
            use_sitemap,
            fetch_linked_documents: true,
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Builds a single-font PDF with one text line per page
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), Object::Integer(12)]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("Failed to encode content"),
            ));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to write PDF");
    bytes
}

#[tokio::test]
async fn test_limit_one_processes_only_the_seed() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<p>Write to info@example.com</p><a href="/about">About</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>about@example.com</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(1, false),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 1);
    assert!(!report.interrupted);
    assert_eq!(report.emails.len(), 1);
    assert_eq!(
        report.emails["info@example.com"],
        format!("{}/", mock_server.uri())
    );
}

#[tokio::test]
async fn test_crawl_stays_in_scope() {
    let mock_server = MockServer::start().await;
    let port = mock_server.address().port();

    // `localhost` reaches the same mock server but is a different domain
    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="http://localhost:{port}/offsite">Partner</a>
               <a href="http://elsewhere.example.org/team">Elsewhere</a>
               <a href="/team">Team</a>"#
        ),
    )
    .await;
    mount_page(&mock_server, "/team", "<p>team@example.com</p>").await;

    Mock::given(method("GET"))
        .and(path("/offsite"))
        .respond_with(html("<p>nobody@example.org</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(10, false),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.scope, "127.0.0.1");
    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.pages_failed, 0);
    assert!(report.emails.contains_key("team@example.com"));
    assert!(!report.emails.contains_key("nobody@example.org"));
}

#[tokio::test]
async fn test_first_source_wins_across_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "<p>shared@example.com</p>").await;
    mount_page(
        &mock_server,
        "/b",
        "<p>shared@example.com and only-b@example.com</p>",
    )
    .await;

    let report = run_crawl(
        create_test_config(10, false),
        &base,
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.emails["shared@example.com"], format!("{}/a", base));
    assert_eq!(report.emails["only-b@example.com"], format!("{}/b", base));
}

#[tokio::test]
async fn test_sitemap_seeds_frontier() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/one</loc></url>
  <url><loc>{base}/two</loc></url>
  <url><loc>{base}/three</loc></url>
  <url><loc>http://elsewhere.example.org/four</loc></url>
  <url><loc>{base}/</loc></url>
</urlset>"#
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sitemap, "application/xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut crawler = Crawler::new(create_test_config(10, true), &base).expect("Bad seed");
    let added = crawler.seed_from_sitemap().await;

    assert_eq!(added, 3);
    assert_eq!(
        crawler.state().frontier().collect::<Vec<_>>(),
        vec![
            format!("{}/", base),
            format!("{}/one", base),
            format!("{}/two", base),
            format!("{}/three", base),
        ]
    );
}

#[tokio::test]
async fn test_missing_sitemap_is_ignored() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", "<p>hello@example.com</p>").await;

    // No /sitemap.xml mock: wiremock answers 404
    let report = run_crawl(
        create_test_config(5, true),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 1);
    assert!(report.emails.contains_key("hello@example.com"));
}

#[tokio::test]
async fn test_failed_fetch_consumes_budget() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("<p>ok@example.com</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(2, false),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.pages_failed, 1);
    assert!(report.emails.is_empty());
}

#[tokio::test]
async fn test_unsupported_content_type_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/data">Data</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"email\":\"json@example.com\"}", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(5, false),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.pages_skipped, 1);
    assert!(report.emails.is_empty());
}

#[tokio::test]
async fn test_linked_document_is_credited_and_free() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/staff.txt">Staff list</a><a href="/next">Next</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/staff.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Contact: hr@example.com\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/next", "<p>next@example.com</p>").await;

    // Two pages of budget: the seed and /next. The document is extra.
    let report = run_crawl(
        create_test_config(2, false),
        &base,
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.documents_fetched, 1);
    assert_eq!(report.emails["hr@example.com"], format!("{}/staff.txt", base));
    assert_eq!(report.emails["next@example.com"], format!("{}/next", base));
}

#[tokio::test]
async fn test_linked_pdf_document_is_scanned() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<p>Annual report below</p><a href="/files/report.pdf">Report</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(build_pdf(&["Investors: ir@example.com"]), "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(5, false),
        &base,
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.documents_fetched, 1);
    assert_eq!(
        report.emails["ir@example.com"],
        format!("{}/files/report.pdf", base)
    );
}

#[tokio::test]
async fn test_linked_documents_can_be_disabled() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/staff.txt">Staff list</a>"#).await;

    // Still crawled as an ordinary frontier page
    Mock::given(method("GET"))
        .and(path("/staff.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hr@example.com"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(5, false);
    config.crawler.fetch_linked_documents = false;

    let report = run_crawl(config, &mock_server.uri(), std::future::pending::<()>())
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.documents_fetched, 0);
    assert!(report.emails.contains_key("hr@example.com"));
}

#[tokio::test]
async fn test_mailto_and_obfuscated_addresses() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="mailto:press@example.com?subject=Hello">Press</a>
           <p>sales [at] example [dot] com</p>
           <p>support(at)example(dot)net</p>
           <p>jobs&#64;example.com</p>"#,
    )
    .await;

    let report = run_crawl(
        create_test_config(1, false),
        &mock_server.uri(),
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    let found: Vec<&str> = report.emails.keys().map(String::as_str).collect();
    assert_eq!(
        found,
        vec![
            "jobs@example.com",
            "press@example.com",
            "sales@example.com",
            "support@example.net",
        ]
    );
}

#[tokio::test]
async fn test_results_round_trip_through_csv() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<p>zed@example.com</p><a href="/more">More</a>"#,
    )
    .await;
    mount_page(&mock_server, "/more", "<p>amy@example.com</p>").await;

    let report = run_crawl(
        create_test_config(5, false),
        &base,
        std::future::pending::<()>(),
    )
    .await
    .expect("Crawl failed");

    let dir = TempDir::new().expect("Failed to create temp dir");
    let results_path = dir.path().join("results.csv");
    CsvSink::new(&results_path)
        .write_results(&report.emails)
        .expect("Failed to write results");

    let rows = read_results(&results_path).expect("Failed to read results");
    assert_eq!(
        rows,
        vec![
            ("amy@example.com".to_string(), format!("{}/more", base)),
            ("zed@example.com".to_string(), format!("{}/", base)),
        ]
    );
}

#[tokio::test]
async fn test_interrupt_keeps_partial_results() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<p>early@example.com</p><a href="/slow">Slow</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late@example.com</p>").set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let crawler =
        Crawler::new(create_test_config(10, false), &mock_server.uri()).expect("Bad seed");
    let report = crawler
        .run_until(tokio::time::sleep(Duration::from_millis(1000)))
        .await;

    assert!(report.interrupted);
    assert_eq!(report.pages_processed, 2);
    assert!(report.emails.contains_key("early@example.com"));
    assert!(!report.emails.contains_key("late@example.com"));
}

#[tokio::test]
async fn test_interrupt_before_first_page() {
    let mock_server = MockServer::start().await;

    let crawler =
        Crawler::new(create_test_config(10, false), &mock_server.uri()).expect("Bad seed");
    let report = crawler.run_until(async {}).await;

    // The seed was taken from the frontier but contributes nothing
    assert!(report.interrupted);
    assert!(report.emails.is_empty());
    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.pages_failed, 0);
}

#[tokio::test]
async fn test_interrupt_during_sitemap_seeding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>never@example.com</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = run_crawl(
        create_test_config(10, true),
        &mock_server.uri(),
        tokio::time::sleep(Duration::from_millis(300)),
    )
    .await
    .expect("Crawl failed");

    assert!(report.interrupted);
    assert_eq!(report.pages_processed, 0);
    assert!(report.emails.is_empty());
    assert!(report.elapsed < Duration::from_secs(4));
}
