use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use client_logging::client_warn;
use futures_util::{Stream, StreamExt};

use analyzer_core::StatusEvent;

use crate::error::map_reqwest_error;
use crate::transport::{JobTracker, StatusStream};
use crate::wire::StatusEventWire;
use crate::TransportError;

#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub connect_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Server-push transport: one long-lived `GET /stream/{job_id}` connection
/// delivering status events as SSE messages.
#[derive(Debug, Clone)]
pub struct StreamTransport {
    base_url: String,
    client: reqwest::Client,
}

impl StreamTransport {
    pub fn new(base_url: impl Into<String>, settings: StreamSettings) -> Result<Self, TransportError> {
        // Connect timeout only. A whole-request timeout would sever a
        // healthy stream that simply has a slow job behind it.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl JobTracker for StreamTransport {
    async fn open(&self, job_id: &str) -> Result<StatusStream, TransportError> {
        let url = format!("{}/stream/{}", self.base_url.trim_end_matches('/'), job_id);
        let response = self.client.get(&url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        Ok(sse_status_stream(response.bytes_stream()))
    }
}

struct SseParser {
    inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
    buffer: Vec<u8>,
    pending: VecDeque<StatusEvent>,
    done: bool,
}

/// Buffers incoming byte chunks, splits on newlines, and decodes `data:`
/// lines into status events. Lines are converted to text only once they
/// are complete, so multi-byte characters split across chunks survive.
fn sse_status_stream<S>(byte_stream: S) -> StatusStream
where
    S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
{
    let parser = SseParser {
        inner: Box::pin(byte_stream),
        buffer: Vec::new(),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(futures_util::stream::unfold(parser, |mut parser| async move {
        if let Some(event) = parser.pending.pop_front() {
            return Some((Ok(event), parser));
        }
        if parser.done {
            return None;
        }

        loop {
            match parser.inner.next().await {
                Some(Ok(chunk)) => {
                    parser.buffer.extend_from_slice(&chunk);
                    while let Some(pos) = parser.buffer.iter().position(|&b| b == b'\n') {
                        let line: Vec<u8> = parser.buffer.drain(..=pos).collect();
                        if let Some(event) = parse_sse_line(&line) {
                            parser.pending.push_back(event);
                        }
                    }
                    if let Some(event) = parser.pending.pop_front() {
                        return Some((Ok(event), parser));
                    }
                    // No complete event yet; keep reading.
                }
                Some(Err(err)) => {
                    parser.done = true;
                    return Some((Err(map_reqwest_error(err)), parser));
                }
                None => {
                    parser.done = true;
                    let rest = std::mem::take(&mut parser.buffer);
                    if let Some(event) = parse_sse_line(&rest) {
                        return Some((Ok(event), parser));
                    }
                    return None;
                }
            }
        }
    }))
}

/// Decodes one SSE line. Empty lines, comments and non-data fields yield
/// nothing; a malformed `data:` payload is logged and skipped rather than
/// terminating the stream.
fn parse_sse_line(line: &[u8]) -> Option<StatusEvent> {
    let line = String::from_utf8_lossy(line);
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed.strip_prefix("data:")?.trim_start();
    match StatusEventWire::decode(data) {
        Ok(event) => Some(event),
        Err(err) => {
            client_warn!("skipping undecodable stream message: {err}");
            None
        }
    }
}
