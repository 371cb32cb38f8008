use analyzer_app::render::{format_section, phase_label, section_heading};
use analyzer_core::{Phase, SectionKey};

#[test]
fn phase_labels_match_the_product_wording() {
    assert_eq!(phase_label(Phase::Validating), "Đang kiểm tra tài liệu...");
    assert_eq!(phase_label(Phase::ProcessingPdf), "Đang xử lý PDF...");
    assert_eq!(
        phase_label(Phase::ProcessingImage {
            current: 2,
            total: 5
        }),
        "Đang xử lý ảnh 2/5"
    );
    assert_eq!(
        phase_label(Phase::Analyzing(SectionKey::Benefits)),
        "Đang phân tích quyền lợi bảo hiểm..."
    );
    assert_eq!(phase_label(Phase::Processing), "Đang xử lý...");
}

#[test]
fn headings_cover_all_five_sections() {
    let headings: Vec<_> = SectionKey::ALL.into_iter().map(section_heading).collect();
    assert_eq!(
        headings,
        vec![
            "Quyền lợi bảo hiểm",
            "Chi phí tổng thể hàng năm",
            "Giá trị hoàn lại",
            "Các điều khoản loại trừ",
            "Quy trình claim"
        ]
    );
}

#[test]
fn formats_headings_bold_and_paragraphs() {
    let html = format_section("## Quyền lợi\nMức chi trả **100 triệu** mỗi năm.");
    assert_eq!(
        html,
        "<h2>Quyền lợi</h2>\n<p>Mức chi trả <strong>100 triệu</strong> mỗi năm.</p>\n"
    );
}

#[test]
fn groups_bullet_runs_into_one_list() {
    let html = format_section("- quyền lợi A\n- quyền lợi B\n\nghi chú");
    assert_eq!(
        html,
        "<ul>\n<li>quyền lợi A</li>\n<li>quyền lợi B</li>\n</ul>\n<p>ghi chú</p>\n"
    );
}

#[test]
fn renders_pipe_tables() {
    let html = format_section("| Năm | Tỷ lệ |\n|---|---|\n| 1 | 80% |\n| 2 | 85% |");
    assert!(html.starts_with("<table>"));
    assert!(html.contains("<th>Năm</th><th>Tỷ lệ</th>"));
    assert!(html.contains("<td>1</td><td>80%</td>"));
    assert!(html.contains("<td>2</td><td>85%</td>"));
    assert!(html.ends_with("</table>\n"));
}

#[test]
fn is_total_on_malformed_input() {
    // Unmatched bold markers pass through verbatim.
    assert_eq!(format_section("giá trị **mở"), "<p>giá trị **mở</p>\n");
    // A lone pipe line with no separator is just a paragraph.
    assert_eq!(format_section("| không phải bảng"), "<p>| không phải bảng</p>\n");
    assert_eq!(format_section(""), "");
}
