//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! crawl cycle end-to-end: traversal, candidate resolution, downloads, text
//! files and the index.

use async_trait::async_trait;
use minutes_harvester::config::UserAgentConfig;
use minutes_harvester::crawler::{build_http_client, CrawlOptions, CrawlState, Crawler, ReplayPolicy};
use minutes_harvester::extract::{Extraction, TextExtractor, EXTRACTION_ERROR_MARKER};
use minutes_harvester::index::{read_index, CsvIndex, IndexRecord, IndexStore, MemoryIndex};
use minutes_harvester::output::CrawlReport;
use minutes_harvester::YearWindow;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4 proces-verbal";

/// Returns the PDF bytes as text, or fails when asked to
struct FakeExtractor {
    fail: bool,
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, pdf: Vec<u8>) -> Extraction {
        if self.fail {
            Extraction::Failed("unsupported font".to_string())
        } else {
            Extraction::Extracted(String::from_utf8_lossy(&pdf).into_owned())
        }
    }
}

fn create_test_options(out_dir: &Path, from_year: i32, to_year: i32) -> CrawlOptions {
    CrawlOptions {
        out_dir: out_dir.to_path_buf(),
        window: YearWindow::new(from_year, to_year),
        max_pages: 50,
        page_timeout: Duration::from_secs(5),
        pdf_timeout: Duration::from_secs(5),
        replay: ReplayPolicy::All,
    }
}

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact: "tests".to_string(),
    }
}

/// Runs one crawl from `seed` and hands back the index and the report
async fn crawl_with<S: IndexStore>(
    seed: &str,
    options: CrawlOptions,
    index: S,
    fail_extraction: bool,
) -> (S, CrawlReport) {
    let client = build_http_client(&test_user_agent()).expect("Failed to build client");
    let seed = Url::parse(seed).expect("Failed to parse seed");
    let state = CrawlState::new(&[seed]).expect("Failed to build state");

    let extractor = FakeExtractor {
        fail: fail_extraction,
    };
    let mut crawler = Crawler::new(client, options, index, extractor);
    let (_, report) = crawler.run(state).await.expect("Crawl failed");
    (crawler.into_index(), report)
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_pdf(server: &MockServer, pdf: &str, expected_requests: u64) {
    Mock::given(method("GET"))
        .and(path(pdf))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PDF_BYTES.to_vec(), "application/pdf"))
        .expect(expected_requests)
        .mount(server)
        .await;
}

fn page_with_links(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!(r#"<a href="{}">{}</a>"#, href, text))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "<html><head><title>Conseils municipaux</title></head><body>{}</body></html>",
        anchors
    )
}

#[tokio::test]
async fn test_dated_minutes_downloaded_and_extracted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/conseils/",
        page_with_links(&[("/docs/CM_15mars2019.pdf", "PV du 15 mars 2019")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/CM_15mars2019.pdf", 1).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let index = CsvIndex::in_dir(out.path());
    let (_, report) = crawl_with(&format!("{}/conseils/", base_url), options, index, false).await;

    let pdf_path = out.path().join("pdf/docs_CM_15mars2019.pdf");
    let txt_path = out.path().join("txt/docs_CM_15mars2019.txt");
    assert_eq!(std::fs::read(&pdf_path).unwrap(), PDF_BYTES);
    assert_eq!(
        std::fs::read_to_string(&txt_path).unwrap(),
        "%PDF-1.4 proces-verbal"
    );

    let rows = read_index(&out.path().join("index.csv")).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.url, format!("{}/docs/CM_15mars2019.pdf", base_url));
    assert_eq!(row.guessed_date.as_deref(), Some("2019-03-15"));
    assert!(row.kept_by_year_filter);
    assert_eq!(row.http_status, "200");
    assert_eq!(row.local_pdf.as_deref(), Some(pdf_path.to_str().unwrap()));
    assert_eq!(row.local_txt.as_deref(), Some(txt_path.to_str().unwrap()));
    assert_eq!(row.title_or_anchor, "PV du 15 mars 2019");
    assert_eq!(row.source_page, format!("{}/conseils/", base_url));

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.candidates, 1);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.texts_written, 1);
    assert!(!out.path().join("index.csv.partial").exists());

    let header = std::fs::read_to_string(out.path().join("index.csv")).unwrap();
    assert!(header.starts_with(
        "url,local_pdf,local_txt,http_status,guessed_date,kept_by_year_filter,title_or_anchor,source_page\n"
    ));
    assert!(header.contains(",True,"));
}

#[tokio::test]
async fn test_second_run_replays_without_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[
            ("/docs/CM_15mars2019.pdf", "PV du 15 mars 2019"),
            ("/docs/CM_2012-06-01.pdf", "PV 2012"),
        ]),
    )
    .await;
    // One download across both runs
    mount_pdf(&mock_server, "/docs/CM_15mars2019.pdf", 1).await;
    mount_pdf(&mock_server, "/docs/CM_2012-06-01.pdf", 0).await;

    let seed = format!("{}/", base_url);
    let index_path = out.path().join("index.csv");

    let options = create_test_options(out.path(), 2014, 2025);
    crawl_with(&seed, options.clone(), CsvIndex::in_dir(out.path()), false).await;
    let first = std::fs::read(&index_path).unwrap();

    let (_, report) = crawl_with(&seed, options, CsvIndex::in_dir(out.path()), false).await;
    let second = std::fs::read(&index_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.candidates, 2);
    assert_eq!(report.replayed, 2);
    assert_eq!(report.downloaded, 0);
    assert_eq!(read_index(&index_path).unwrap().len(), 2);
}

#[tokio::test]
async fn test_out_of_window_not_downloaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/docs/pv_2012-05-04.pdf", "Séance du 4 mai 2012")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/pv_2012-05-04.pdf", 0).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    let rows = index.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].http_status, "SKIPPED_BY_YEAR_FILTER");
    assert_eq!(rows[0].guessed_date.as_deref(), Some("2012-05-04"));
    assert!(!rows[0].kept_by_year_filter);
    assert_eq!(rows[0].local_pdf, None);
    assert_eq!(report.skipped_by_year, 1);
    assert!(!out.path().join("pdf/docs_pv_2012-05-04.pdf").exists());
}

#[tokio::test]
async fn test_undated_pdf_always_attempted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/report.pdf", "Rapport annuel")]),
    )
    .await;
    mount_pdf(&mock_server, "/report.pdf", 1).await;

    let options = create_test_options(out.path(), 2020, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    let row = &index.rows()[0];
    assert_eq!(row.guessed_date, None);
    assert!(row.kept_by_year_filter);
    assert_eq!(row.http_status, "200");
    assert!(out.path().join("pdf/report.pdf").exists());
    assert_eq!(report.downloaded, 1);
}

#[tokio::test]
async fn test_rejected_downloads_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[
            ("/docs/cm_2019-01-10.pdf", "PV janvier"),
            ("/docs/cm_2019-02-14.pdf", "PV février"),
        ]),
    )
    .await;
    // An HTML error page served under a .pdf name
    Mock::given(method("GET"))
        .and(path("/docs/cm_2019-01-10.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>Not found</html>", "text/html"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/cm_2019-02-14.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    let rows = index.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].http_status, "200");
    assert_eq!(rows[0].local_pdf, None);
    assert_eq!(rows[1].http_status, "404");
    assert_eq!(rows[1].local_pdf, None);
    assert_eq!(report.download_failures, 2);
    assert_eq!(report.downloaded, 0);
}

#[tokio::test]
async fn test_unreachable_pdf_recorded_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    // Nothing listens on port 9 of localhost
    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("http://127.0.0.1:9/docs/cm_2019-03-01.pdf", "PV mars")]),
    )
    .await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    let row = &index.rows()[0];
    assert!(row.http_status.starts_with("ERROR:"), "got {}", row.http_status);
    assert_eq!(row.local_pdf, None);
    assert_eq!(report.download_failures, 1);
}

#[tokio::test]
async fn test_stays_on_domain() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let other_url = other_server.uri();
    let out = TempDir::new().unwrap();

    let elsewhere = format!("{}/elsewhere/", other_url);
    let hosted_pdf = format!("{}/files/cm_2018-09-20.pdf", other_url);
    mount_html(
        &mock_server,
        "/",
        page_with_links(&[
            ("/archives/", "Archives"),
            (elsewhere.as_str(), "Ailleurs"),
            (hosted_pdf.as_str(), "PV hébergé"),
        ]),
    )
    .await;
    mount_html(&mock_server, "/archives/", page_with_links(&[])).await;

    // Off-domain pages are never fetched, off-domain PDFs are candidates
    Mock::given(method("GET"))
        .and(path("/elsewhere/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&other_server)
        .await;
    mount_pdf(&other_server, "/files/cm_2018-09-20.pdf", 1).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(index.rows().len(), 1);
    assert_eq!(index.rows()[0].http_status, "200");
}

#[tokio::test]
async fn test_page_budget_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(&mock_server, "/p0", page_with_links(&[("/p1", "next")])).await;
    mount_html(&mock_server, "/p1", page_with_links(&[("/p2", "next")])).await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut options = create_test_options(out.path(), 2014, 2025);
    options.max_pages = 2;

    let client = build_http_client(&test_user_agent()).unwrap();
    let state = CrawlState::new(&[Url::parse(&format!("{}/p0", base_url)).unwrap()]).unwrap();
    let mut crawler = Crawler::new(client, options, MemoryIndex::new(), FakeExtractor { fail: false });
    let (state, report) = crawler.run(state).await.unwrap();

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(state.pending_count(), 1);
    assert_eq!(state.visited_count(), 2);
}

#[tokio::test]
async fn test_non_html_pages_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/agenda.ics", "Agenda"), ("/missing/", "Gone")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/agenda.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("BEGIN:VCALENDAR", "text/calendar"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.non_html_pages, 1);
    assert_eq!(report.failed_pages, 1);
    assert!(index.rows().is_empty());
    assert!(index.is_finished());
}

#[tokio::test]
async fn test_one_row_per_distinct_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[
            ("/docs/pv-2021-03-02.pdf", "PV"),
            ("/docs/pv-2021-03-02.pdf#page=2", "PV, page 2"),
            ("/seances/", "Séances"),
        ]),
    )
    .await;
    mount_html(
        &mock_server,
        "/seances/",
        page_with_links(&[("/docs/pv-2021-03-02.pdf", "Conseil du 2 mars 2021")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/pv-2021-03-02.pdf", 1).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), false).await;

    assert_eq!(index.rows().len(), 1);
    assert_eq!(report.candidates, 1);
    assert_eq!(index.rows()[0].title_or_anchor, "PV");
}

#[tokio::test]
async fn test_extraction_failure_writes_marker() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/scan_2020-11-05.pdf", "Scan")]),
    )
    .await;
    mount_pdf(&mock_server, "/scan_2020-11-05.pdf", 1).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) =
        crawl_with(&format!("{}/", base_url), options, MemoryIndex::new(), true).await;

    let text = std::fs::read_to_string(out.path().join("txt/scan_2020-11-05.txt")).unwrap();
    assert_eq!(text, format!("{} unsupported font", EXTRACTION_ERROR_MARKER));
    assert!(index.rows()[0].local_txt.is_some());
    assert_eq!(report.extraction_failures, 1);
}

fn previous_record(url: &str, status: &str, date: &str) -> IndexRecord {
    IndexRecord {
        url: url.to_string(),
        local_pdf: None,
        local_txt: None,
        http_status: status.to_string(),
        guessed_date: Some(date.to_string()),
        kept_by_year_filter: false,
        title_or_anchor: "PV".to_string(),
        source_page: "https://old.example/".to_string(),
    }
}

#[tokio::test]
async fn test_replay_recomputes_kept_flag_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();
    let pdf_url = format!("{}/docs/pv-2016-04-12.pdf", base_url);

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/docs/pv-2016-04-12.pdf", "PV avril")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/pv-2016-04-12.pdf", 0).await;

    let previous = MemoryIndex::with_records(vec![previous_record(
        &pdf_url,
        "SKIPPED_BY_YEAR_FILTER",
        "2016-04-12",
    )]);

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) = crawl_with(&format!("{}/", base_url), options, previous, false).await;

    let row = &index.rows()[0];
    assert!(row.kept_by_year_filter);
    assert_eq!(row.http_status, "SKIPPED_BY_YEAR_FILTER");
    assert_eq!(row.source_page, "https://old.example/");
    assert_eq!(report.replayed, 1);
}

#[tokio::test]
async fn test_retry_failed_refetches_incomplete_entries() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();
    let pdf_url = format!("{}/docs/pv-2019-06-20.pdf", base_url);

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/docs/pv-2019-06-20.pdf", "PV juin")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/pv-2019-06-20.pdf", 1).await;

    let previous = MemoryIndex::with_records(vec![previous_record(&pdf_url, "503", "2019-06-20")]);

    let mut options = create_test_options(out.path(), 2014, 2025);
    options.replay = ReplayPolicy::RetryIncomplete;
    let (index, report) = crawl_with(&format!("{}/", base_url), options, previous, false).await;

    let row = &index.rows()[0];
    assert_eq!(row.http_status, "200");
    assert!(row.local_pdf.is_some());
    assert_eq!(report.replayed, 0);
    assert_eq!(report.downloaded, 1);
}

#[tokio::test]
async fn test_unseen_entries_carried_over() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(&mock_server, "/", page_with_links(&[])).await;

    let previous = MemoryIndex::with_records(vec![previous_record(
        "https://old.example/docs/pv-2013-01-01.pdf",
        "SKIPPED_BY_YEAR_FILTER",
        "2013-01-01",
    )]);

    let options = create_test_options(out.path(), 2010, 2025);
    let (index, report) = crawl_with(&format!("{}/", base_url), options, previous, false).await;

    assert_eq!(report.carried_over, 1);
    assert_eq!(index.rows().len(), 1);
    assert!(index.rows()[0].kept_by_year_filter);
    assert!(index.is_finished());
}

#[tokio::test]
async fn test_replay_matches_url_with_query() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();
    let pdf_url = format!("{}/docs/pv_2019-03-15.pdf?download", base_url);

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/docs/pv_2019-03-15.pdf?download", "PV mars")]),
    )
    .await;
    mount_pdf(&mock_server, "/docs/pv_2019-03-15.pdf", 0).await;

    let mut record = previous_record(&pdf_url, "200", "2019-03-15");
    record.local_pdf = Some("data/pdf/docs_pv_2019-03-15.pdf".to_string());
    let previous = MemoryIndex::with_records(vec![record]);

    let options = create_test_options(out.path(), 2014, 2025);
    let (index, report) = crawl_with(&format!("{}/", base_url), options, previous, false).await;

    assert_eq!(index.rows().len(), 1);
    assert_eq!(index.rows()[0].url, pdf_url);
    assert_eq!(report.replayed, 1);
    assert_eq!(report.carried_over, 0);
}

#[tokio::test]
async fn test_same_path_different_query_kept_apart() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/dl.pdf?id=1", "PV janvier"), ("/dl.pdf?id=2", "PV février")]),
    )
    .await;
    mount_pdf(&mock_server, "/dl.pdf", 2).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let index = MemoryIndex::new();
    let (index, report) = crawl_with(&format!("{}/", base_url), options, index, false).await;

    assert_eq!(report.downloaded, 2);
    let rows = index.rows();
    assert_eq!(rows.len(), 2);
    let plain = out.path().join("pdf/dl.pdf");
    assert_eq!(rows[0].local_pdf.as_deref(), Some(plain.to_str().unwrap()));
    assert_ne!(rows[0].local_pdf, rows[1].local_pdf);
    assert_ne!(rows[0].local_txt, rows[1].local_txt);

    let pdfs = std::fs::read_dir(out.path().join("pdf")).unwrap().count();
    assert_eq!(pdfs, 2);
}

#[tokio::test]
async fn test_off_domain_redirect_not_parsed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(&mock_server, "/", page_with_links(&[("/moved", "Archives")])).await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/landing/", other_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    mount_html(
        &other_server,
        "/landing/",
        page_with_links(&[("/docs/pv-2019-01-10.pdf", "PV janvier"), ("/seances", "Séances")]),
    )
    .await;
    mount_pdf(&other_server, "/docs/pv-2019-01-10.pdf", 0).await;
    Mock::given(method("GET"))
        .and(path("/seances"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let options = create_test_options(out.path(), 2014, 2025);
    let index = MemoryIndex::new();
    let (index, report) = crawl_with(&format!("{}/", base_url), options, index, false).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.candidates, 0);
    assert!(index.rows().is_empty());
}

#[tokio::test]
async fn test_on_domain_redirect_target_marked_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/",
        page_with_links(&[("/old", "Ancien"), ("/new", "Nouveau")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            page_with_links(&[("docs/pv-2019-05-02.pdf", "PV mai")]),
            "text/html",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_pdf(&mock_server, "/docs/pv-2019-05-02.pdf", 1).await;

    let options = create_test_options(out.path(), 2014, 2025);
    let index = MemoryIndex::new();
    let (index, report) = crawl_with(&format!("{}/", base_url), options, index, false).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(index.rows().len(), 1);
    assert_eq!(index.rows()[0].url, format!("{}/docs/pv-2019-05-02.pdf", base_url));
    assert_eq!(index.rows()[0].source_page, format!("{}/old", base_url));
}
