//! Integration tests for the enrichment pipeline
//!
//! These tests use wiremock to serve company websites and run the full
//! read, crawl and write cycle end-to-end.

use email_enricher::config::Config;
use email_enricher::crawler::{enrich_file, enrich_file_with, HttpFetcher};
use email_enricher::table::{parse_records, EncodingDetector};
use email_enricher::EnricherError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.concurrency = 3;
    config.crawler.request_delay_ms = 0;
    config.crawler.deadline_secs = 60;
    config.fetcher.timeout_secs = 5;
    config
}

fn write_input(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write input table");
    path
}

fn read_output(path: &Path) -> Vec<Vec<String>> {
    let text = std::fs::read_to_string(path).expect("Failed to read output table");
    assert!(text.starts_with('\u{feff}'), "output should start with a BOM");
    parse_records(&text)
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_enrichment() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/alpha",
        200,
        r#"<html><body>
            <p>Sales: sales@alpha.com</p>
            <a href="mailto:Contact@Alpha.com?subject=Hello">Write to us</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/beta",
        200,
        "<html><body><p>Reach jane [at] beta.co.kr for details</p></body></html>",
    )
    .await;
    mount_page(&server, "/gamma", 404, "not here").await;
    mount_page(
        &server,
        "/delta",
        200,
        "<html><body><img src=\"logo@2x.png\"><p>No contact info</p></body></html>",
    )
    .await;

    let input = format!(
        "Company,Website,Email,Notes\n\
         Alpha,{base}/alpha,,first\n\
         \"Beta, \"\"Best\"\" Ltd\",{base}/beta,old@beta.com,second\n\
         Gamma,{base}/gamma,,third\n\
         Delta,{base}/delta,,fourth\n\
         Epsilon,,,fifth\n\
         Zeta,zeta.example.com,,sixth\n"
    );

    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "companies.csv", input.as_bytes());

    let summary = enrich_file(
        &create_test_config(),
        &input_path,
        None,
        CancellationToken::new(),
        None,
    )
    .await
    .expect("Enrichment failed");

    assert_eq!(summary.output_path, dir.path().join("companies_updated.csv"));
    assert_eq!(summary.total, 6);
    assert_eq!(summary.processed, 6);
    assert_eq!(summary.succeeded, 2);
    assert!(summary.is_complete());

    let records = read_output(&summary.output_path);
    assert_eq!(records.len(), 7);
    assert_eq!(records[0], vec!["Company", "Website", "Email", "Notes"]);

    let emails: Vec<&str> = records[1..].iter().map(|r| r[2].as_str()).collect();
    assert_eq!(
        emails,
        vec!["contact@alpha.com", "jane@beta.co.kr", "X", "X", "X", "X"]
    );

    // Pass-through columns and quoting survive
    assert_eq!(records[2][0], "Beta, \"Best\" Ltd");
    let notes: Vec<&str> = records[1..].iter().map(|r| r[3].as_str()).collect();
    assert_eq!(
        notes,
        vec!["first", "second", "third", "fourth", "fifth", "sixth"]
    );
}

#[tokio::test]
async fn test_all_empty_websites_only_touch_email_column() {
    let input = "회사명,홈페이지,이메일,비고\n\
                 가나상사,,,서울\n\
                 다라물산,,old@dara.kr,부산\n\
                 \"Ma, Inc\",,,\"line one\nline two\"\n";

    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "list.csv", input.as_bytes());

    let summary = enrich_file(
        &create_test_config(),
        &input_path,
        None,
        CancellationToken::new(),
        None,
    )
    .await
    .expect("Enrichment failed");

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.processed, 3);

    let original = parse_records(input);
    let updated = read_output(&summary.output_path);
    assert_eq!(original.len(), updated.len());
    assert_eq!(original[0], updated[0]);

    for (before, after) in original[1..].iter().zip(&updated[1..]) {
        assert_eq!(after[2], "X");
        for column in [0, 1, 3] {
            assert_eq!(before[column], after[column]);
        }
    }
}

#[tokio::test]
async fn test_euc_kr_input() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, "<p>문의: info@hangul.co.kr</p>").await;

    let text = format!("업체명,홈페이지,이메일\n한글상사,{}/,\n", server.uri());
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(&text);
    assert!(!had_errors);

    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "korean.csv", &bytes);
    let output_path = dir.path().join("result.csv");

    let summary = enrich_file(
        &create_test_config(),
        &input_path,
        Some(&output_path),
        CancellationToken::new(),
        None,
    )
    .await
    .expect("Enrichment failed");

    assert_eq!(summary.output_path, output_path);

    let records = read_output(&output_path);
    assert_eq!(records[0], vec!["업체명", "홈페이지", "이메일"]);
    assert_eq!(records[1][0], "한글상사");
    assert_eq!(records[1][2], "info@hangul.co.kr");
}

/// Detector that records every buffer it is shown
struct RecordingDetector {
    seen: Mutex<Vec<Vec<u8>>>,
}

impl EncodingDetector for RecordingDetector {
    fn detect_bytes(&self, bytes: &[u8]) -> String {
        self.seen.lock().unwrap().push(bytes.to_vec());
        "EUC-KR".to_string()
    }
}

#[tokio::test]
async fn test_detector_sees_the_bytes_that_get_decoded() {
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode("업체명,홈페이지,이메일
한글상사,,
");
    assert!(!had_errors);

    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "korean.csv", &bytes);

    let config = create_test_config();
    let detector = RecordingDetector {
        seen: Mutex::new(Vec::new()),
    };
    let source = Arc::new(HttpFetcher::from_config(&config).unwrap());

    let summary = enrich_file_with(
        &config,
        &input_path,
        None,
        &detector,
        source,
        CancellationToken::new(),
        None,
    )
    .await
    .expect("Enrichment failed");

    let seen = detector.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], bytes.as_ref());

    let records = read_output(&summary.output_path);
    assert_eq!(records[0], vec!["업체명", "홈페이지", "이메일"]);
    assert_eq!(records[1], vec!["한글상사", "", "X"]);
}

#[tokio::test]
async fn test_order_preserved_with_uneven_latency() {
    let server = MockServer::start().await;

    for i in 0..6u64 {
        Mock::given(method("GET"))
            .and(path(format!("/site{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("<p>owner{}@example.com</p>", i))
                    .set_delay(std::time::Duration::from_millis(30 * (6 - i))),
            )
            .mount(&server)
            .await;
    }

    let mut input = String::from("Company,Website,Email\n");
    for i in 0..6 {
        input.push_str(&format!("Company {},{}/site{},\n", i, server.uri(), i));
    }

    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "ordered.csv", input.as_bytes());

    let summary = enrich_file(
        &create_test_config(),
        &input_path,
        None,
        CancellationToken::new(),
        None,
    )
    .await
    .expect("Enrichment failed");

    let records = read_output(&summary.output_path);
    for i in 0..6 {
        assert_eq!(records[i + 1][0], format!("Company {}", i));
        assert_eq!(records[i + 1][2], format!("owner{}@example.com", i));
    }
}

#[tokio::test]
async fn test_interrupted_run_still_writes_table() {
    let dir = TempDir::new().unwrap();
    let input_path = write_input(
        &dir,
        "partial.csv",
        b"Company,Website,Email\nA,https://a.invalid/,\nB,https://b.invalid/,\n",
    );

    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = enrich_file(&create_test_config(), &input_path, None, cancel, None)
        .await
        .expect("Enrichment failed");

    assert!(summary.interrupted);
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.unresolved, 2);

    let records = read_output(&summary.output_path);
    assert_eq!(records[1][2], "X");
    assert_eq!(records[2][2], "X");
}

#[tokio::test]
async fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");

    let result = enrich_file(
        &create_test_config(),
        &missing,
        None,
        CancellationToken::new(),
        None,
    )
    .await;

    assert!(matches!(result, Err(EnricherError::FileNotFound { .. })));
    assert!(!dir.path().join("nope_updated.csv").exists());
}

#[tokio::test]
async fn test_empty_input_file() {
    let dir = TempDir::new().unwrap();
    let input_path = write_input(&dir, "empty.csv", b"\n\n");

    let result = enrich_file(
        &create_test_config(),
        &input_path,
        None,
        CancellationToken::new(),
        None,
    )
    .await;

    assert!(matches!(result, Err(EnricherError::EmptyTable { .. })));
    assert!(!dir.path().join("empty_updated.csv").exists());
}
