use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use analyzer_core::{SectionKey, SectionMap};

use crate::render;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the finished analysis to a standalone HTML document and writes
/// it atomically by writing a temp file in the target directory and then
/// renaming over the destination.
pub fn write_html(target: &Path, sections: &SectionMap) -> Result<PathBuf, ExportError> {
    let document = build_document(sections);

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(document.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace an existing export deterministically.
    if target.exists() {
        std::fs::remove_file(target)?;
    }
    tmp.persist(target).map_err(|err| ExportError::Io(err.error))?;
    Ok(target.to_path_buf())
}

pub fn build_document(sections: &SectionMap) -> String {
    let mut body = String::new();
    for key in SectionKey::ALL {
        body.push_str("<section>\n");
        body.push_str(&format!("<h2>{}</h2>\n", render::section_heading(key)));
        match sections.get(key).filter(|text| !text.is_empty()) {
            Some(text) => body.push_str(&render::format_section(text)),
            None => body.push_str("<p>Chưa có nội dung</p>\n"),
        }
        body.push_str("</section>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Phân tích hợp đồng bảo hiểm</title>\n</head>\n<body>\n\
         <h1>Kết quả phân tích hợp đồng bảo hiểm</h1>\n{body}</body>\n</html>\n"
    )
}
