use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use analyzer_client::{FilePart, SubmitPayload};

/// Validates the selected files and reads them into a submit payload:
/// either exactly one PDF, or one-or-more JPEG/PNG pages. This is the
/// single validation gate; the session itself does not re-check.
pub fn build_payload(inputs: &[PathBuf]) -> Result<SubmitPayload> {
    if inputs.is_empty() {
        bail!("Vui lòng tải lên file PDF hoặc ảnh hợp đồng bảo hiểm");
    }

    if has_extension(&inputs[0], &["pdf"]) {
        if inputs.len() > 1 {
            bail!("Vui lòng chọn một file PDF duy nhất hoặc chỉ các file ảnh");
        }
        return Ok(SubmitPayload::Pdf(read_part(&inputs[0])?));
    }

    let mut parts = Vec::with_capacity(inputs.len());
    for path in inputs {
        if !has_extension(path, &["jpg", "jpeg", "png"]) {
            bail!(
                "File \"{}\" không phải là file ảnh hợp lệ. Vui lòng chỉ tải lên file ảnh (JPEG, PNG)",
                path.display()
            );
        }
        parts.push(read_part(path)?);
    }
    Ok(SubmitPayload::Images(parts))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

fn read_part(path: &Path) -> Result<FilePart> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("không đọc được file {}", path.display()))?;
    if bytes.is_empty() {
        bail!("File \"{}\" rỗng", path.display());
    }
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(FilePart::new(filename, bytes))
}
