use reqwest::multipart::{Form, Part};

use analyzer_core::GENERIC_FAILURE_MESSAGE;

use crate::wire::{DetailWire, JobCreatedWire};
use crate::SubmitError;

/// One file ready for upload. Validation (extension, non-empty selection)
/// is the caller's job; the session does not re-check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    fn mime(&self) -> &'static str {
        let lower = self.filename.to_lowercase();
        if lower.ends_with(".pdf") {
            "application/pdf"
        } else if lower.ends_with(".png") {
            "image/png"
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            "image/jpeg"
        } else {
            "application/octet-stream"
        }
    }
}

/// Multipart payload for `POST /analyze`: either one PDF or one-or-more
/// photographed pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPayload {
    Pdf(FilePart),
    Images(Vec<FilePart>),
}

/// Posts the payload and returns the assigned job id.
///
/// A non-success response is never retried; its message is the server's
/// JSON `detail` when the body decodes as such, the raw body text when it
/// does not, or the generic fallback for an empty body.
pub async fn submit(
    client: &reqwest::Client,
    base_url: &str,
    payload: SubmitPayload,
) -> Result<String, SubmitError> {
    let mut form = Form::new();
    match payload {
        SubmitPayload::Pdf(part) => {
            form = form.part("file", file_part(part)?);
        }
        SubmitPayload::Images(parts) => {
            for part in parts {
                form = form.part("images", file_part(part)?);
            }
        }
    }

    let url = format!("{}/analyze", base_url.trim_end_matches('/'));
    let response = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|err| SubmitError::Network(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<DetailWire>(&body) {
            Ok(detail) => detail.detail,
            Err(_) if body.trim().is_empty() => GENERIC_FAILURE_MESSAGE.to_string(),
            Err(_) => body,
        };
        return Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let created: JobCreatedWire = response
        .json()
        .await
        .map_err(|err| SubmitError::InvalidResponse(err.to_string()))?;
    Ok(created.job_id)
}

fn file_part(part: FilePart) -> Result<Part, SubmitError> {
    let mime = part.mime();
    Part::bytes(part.bytes)
        .file_name(part.filename)
        .mime_str(mime)
        .map_err(|err| SubmitError::InvalidResponse(err.to_string()))
}
