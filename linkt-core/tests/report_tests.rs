// Tests for link test reports

use linkt_core::report::{
    Record, StatusBand, TestReport, format_test_result, report_path, write_report,
};
use linkt_core::{LinkKind, Page, PageResponse};
use std::path::Path;
use std::time::Duration;
use url::Url;

fn tested(url: &str, status: u16, reason: Option<&str>) -> Page {
    let mut page = Page::new(Url::parse(url).unwrap())
        .with_kind(LinkKind::Internal)
        .with_parent_url("https://example.com/");
    page.response = Some(PageResponse::new(status, reason.map(str::to_string), None));
    page.request_time = Some(Duration::from_millis(42));
    page
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_record_from_page() {
    let record = Record::from_page(&tested("https://example.com/gone", 404, Some("Not Found"))).unwrap();
    assert_eq!(record.url, "https://example.com/gone");
    assert_eq!(record.status, "404 Not Found");
    assert_eq!(record.request_time, "42 ms");
    assert_eq!(record.parent_url, "https://example.com/");
}

#[test]
fn test_record_for_denied_request() {
    let record = Record::from_page(&tested("https://www.linkedin.com/in/x", 999, None)).unwrap();
    assert_eq!(record.status, "999 Request Denied");
    assert!(StatusBand::from_code(999).is_broken());
}

#[test]
fn test_unfetched_page_has_no_record() {
    let page = Page::new(Url::parse("https://example.com/").unwrap());
    assert!(Record::from_page(&page).is_none());
    assert!(format_test_result(&page).is_none());
}

#[test]
fn test_record_json_field_names() {
    let record = Record::from_page(&tested("https://example.com/", 200, Some("OK"))).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["parentURL", "requestTime", "status", "url"]);
    assert_eq!(value["status"], "200 OK");
}

#[test]
fn test_console_block_mentions_every_field() {
    colored::control::set_override(false);
    let block = format_test_result(&tested("https://example.com/a", 301, Some("Moved Permanently"))).unwrap();
    assert!(block.contains("https://example.com/a\n"));
    assert!(block.contains("\tStatus\t\t\t301 Moved Permanently"));
    assert!(block.contains("\tRequest Time\t\t42 ms"));
    assert!(block.contains("\tParent URL\t\thttps://example.com/"));
}

// ============================================================================
// Report file
// ============================================================================

#[test]
fn test_report_path_is_sanitized() {
    let path = report_path(Path::new("/tmp/out"), "https://example.com/blog");
    assert_eq!(path, Path::new("/tmp/out/https--example.com-blog.json"));
}

#[test]
fn test_write_report_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        Record::from_page(&tested("https://example.com/", 200, Some("OK"))).unwrap(),
        Record::from_page(&tested("https://example.com/gone", 404, Some("Not Found"))).unwrap(),
    ];
    let path = write_report(dir.path(), "https://example.com", records.clone()).unwrap();

    let report: TestReport = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(report.root, "https://example.com");
    assert_eq!(report.results, records);
}

#[test]
fn test_write_report_appends() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_report(dir.path(), "https://example.com", Vec::new()).unwrap();
    let second = write_report(dir.path(), "https://example.com", Vec::new()).unwrap();
    assert_eq!(first, second);

    let contents = std::fs::read_to_string(second).unwrap();
    assert_eq!(contents.matches(r#""root":"https://example.com""#).count(), 2);
}

#[test]
fn test_write_report_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let path = write_report(&nested, "https://example.com", Vec::new()).unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}
