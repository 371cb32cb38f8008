use analyzer_core::{Phase, SectionKey, SectionMap};

/// Progress text per phase, using the product's original labels.
pub fn phase_label(phase: Phase) -> String {
    match phase {
        Phase::Validating => "Đang kiểm tra tài liệu...".to_string(),
        Phase::ProcessingPdf => "Đang xử lý PDF...".to_string(),
        Phase::ProcessingImage { current, total } => {
            format!("Đang xử lý ảnh {current}/{total}")
        }
        Phase::Analyzing(key) => format!("Đang phân tích {}...", section_label(key)),
        Phase::Processing => "Đang xử lý...".to_string(),
        Phase::Completed => "Hoàn tất".to_string(),
        Phase::Failed => "Thất bại".to_string(),
    }
}

/// Short in-sentence name of a section.
pub fn section_label(key: SectionKey) -> &'static str {
    match key {
        SectionKey::Benefits => "quyền lợi bảo hiểm",
        SectionKey::Costs => "chi phí",
        SectionKey::SurrenderValue => "giá trị hoàn lại",
        SectionKey::Exclusions => "điều khoản loại trừ",
        SectionKey::ClaimProcess => "quy trình claim",
    }
}

/// Heading of a section in rendered output.
pub fn section_heading(key: SectionKey) -> &'static str {
    match key {
        SectionKey::Benefits => "Quyền lợi bảo hiểm",
        SectionKey::Costs => "Chi phí tổng thể hàng năm",
        SectionKey::SurrenderValue => "Giá trị hoàn lại",
        SectionKey::Exclusions => "Các điều khoản loại trừ",
        SectionKey::ClaimProcess => "Quy trình claim",
    }
}

/// Prints the finished analysis to stdout, one block per section.
pub fn print_results(sections: &SectionMap) {
    for key in SectionKey::ALL {
        println!("\n== {} ==\n", section_heading(key));
        match sections.get(key).filter(|text| !text.is_empty()) {
            Some(text) => println!("{}", text.trim()),
            None => println!("(chưa có nội dung)"),
        }
    }
}

/// Renders one section's raw markdown-ish text to display markup.
///
/// Pure and total: nothing here fails, and text that matches no rule is
/// passed through as a plain paragraph. Handles the subset the analysis
/// output actually uses: `#`/`##`/`###` headings, `**bold**`, `-` bullet
/// lists, and pipe tables.
pub fn format_section(content: &str) -> String {
    let mut out = String::new();
    let mut in_list = false;
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if trimmed.starts_with('|')
            && lines.peek().map(|next| is_table_separator(next)).unwrap_or(false)
        {
            let header = trimmed.to_string();
            lines.next();
            let mut rows = Vec::new();
            while let Some(next) = lines.peek() {
                let next = next.trim();
                if next.starts_with('|') {
                    rows.push(next.to_string());
                    lines.next();
                } else {
                    break;
                }
            }
            close_list(&mut out, &mut in_list);
            render_table(&mut out, &header, &rows);
        } else if let Some(text) = trimmed.strip_prefix("### ") {
            close_list(&mut out, &mut in_list);
            out.push_str(&format!("<h3>{}</h3>\n", bold(text)));
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            close_list(&mut out, &mut in_list);
            out.push_str(&format!("<h2>{}</h2>\n", bold(text)));
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            close_list(&mut out, &mut in_list);
            out.push_str(&format!("<h1>{}</h1>\n", bold(text)));
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            if !in_list {
                out.push_str("<ul>\n");
                in_list = true;
            }
            out.push_str(&format!("<li>{}</li>\n", bold(item)));
        } else if trimmed.is_empty() {
            close_list(&mut out, &mut in_list);
        } else {
            close_list(&mut out, &mut in_list);
            out.push_str(&format!("<p>{}</p>\n", bold(trimmed)));
        }
    }

    close_list(&mut out, &mut in_list);
    out
}

fn close_list(out: &mut String, in_list: &mut bool) {
    if *in_list {
        out.push_str("</ul>\n");
        *in_list = false;
    }
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn cells(row: &str) -> Vec<&str> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

fn render_table(out: &mut String, header: &str, rows: &[String]) {
    out.push_str("<table>\n<thead>\n<tr>");
    for cell in cells(header) {
        out.push_str(&format!("<th>{}</th>", bold(cell)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in cells(row) {
            out.push_str(&format!("<td>{}</td>", bold(cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Replaces `**text**` pairs with `<strong>`; unmatched markers stay as-is.
fn bold(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&after[..end]);
                out.push_str("</strong>");
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
