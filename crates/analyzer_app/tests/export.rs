use std::fs;

use analyzer_app::export::{build_document, write_html};
use analyzer_core::{SectionKey, SectionMap};

fn sample_sections() -> SectionMap {
    SectionMap::new()
        .with(SectionKey::Benefits, "## Quyền lợi\n- chi trả viện phí")
        .with(SectionKey::ClaimProcess, "nộp hồ sơ trong 30 ngày")
}

#[test]
fn document_contains_every_section_heading() {
    let html = build_document(&sample_sections());

    for key in SectionKey::ALL {
        let heading = match key {
            SectionKey::Benefits => "Quyền lợi bảo hiểm",
            SectionKey::Costs => "Chi phí tổng thể hàng năm",
            SectionKey::SurrenderValue => "Giá trị hoàn lại",
            SectionKey::Exclusions => "Các điều khoản loại trừ",
            SectionKey::ClaimProcess => "Quy trình claim",
        };
        assert!(html.contains(heading), "missing heading for {key:?}");
    }
    assert!(html.contains("<li>chi trả viện phí</li>"));
    // Sections without content carry the placeholder.
    assert!(html.contains("Chưa có nội dung"));
}

#[test]
fn write_html_creates_the_file_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("analysis.html");

    let written = write_html(&target, &sample_sections()).expect("write ok");
    assert_eq!(written, target);

    let html = fs::read_to_string(&target).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("nộp hồ sơ trong 30 ngày"));
}

#[test]
fn write_html_replaces_an_existing_export() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("analysis.html");
    fs::write(&target, "stale").unwrap();

    write_html(&target, &sample_sections()).expect("write ok");

    let html = fs::read_to_string(&target).unwrap();
    assert!(!html.contains("stale"));
    assert!(html.contains("Quy trình claim"));
}

#[test]
fn write_html_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested/out/analysis.html");

    write_html(&target, &sample_sections()).expect("write ok");
    assert!(target.exists());
}
