use std::time::Duration;

use analyzer_core::{Phase, StatusEvent};

use crate::error::map_reqwest_error;
use crate::transport::{JobTracker, StatusStream};
use crate::wire::StatusEventWire;
use crate::TransportError;

/// Surfaced when the poll ceiling is exhausted before the job finished.
pub const POLL_TIMEOUT_MESSAGE: &str =
    "Quá thời gian chờ kết quả phân tích. Vui lòng thử lại sau.";

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Cadence between consecutive status fetches.
    pub interval: Duration,
    /// Overall tick ceiling, independent of the retry controller. With the
    /// default cadence this bounds a job to ten minutes of polling.
    pub max_polls: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 300,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Pull transport: point-in-time `GET /status/{job_id}` fetches at a fixed
/// cadence, for environments where the push stream is unavailable.
#[derive(Debug, Clone)]
pub struct PollTransport {
    base_url: String,
    client: reqwest::Client,
    settings: PollSettings,
}

impl PollTransport {
    pub fn new(base_url: impl Into<String>, settings: PollSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
            settings,
        })
    }
}

struct PollState {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    remaining: u32,
    last_progress: u32,
    first: bool,
    done: bool,
}

#[async_trait::async_trait]
impl JobTracker for PollTransport {
    async fn open(&self, job_id: &str) -> Result<StatusStream, TransportError> {
        let state = PollState {
            client: self.client.clone(),
            url: format!("{}/status/{}", self.base_url.trim_end_matches('/'), job_id),
            interval: self.settings.interval,
            remaining: self.settings.max_polls,
            last_progress: 0,
            first: true,
            done: false,
        };

        Ok(Box::pin(futures_util::stream::unfold(state, |mut state| async move {
            if state.done {
                return None;
            }
            if state.remaining == 0 {
                // Ceiling reached: end with a synthetic application-level
                // failure instead of polling forever.
                state.done = true;
                let timeout = StatusEvent {
                    progress: state.last_progress,
                    phase: Phase::Failed,
                    partial: None,
                    result: None,
                    error: Some(POLL_TIMEOUT_MESSAGE.to_string()),
                };
                return Some((Ok(timeout), state));
            }

            if !state.first {
                tokio::time::sleep(state.interval).await;
            }
            state.first = false;
            state.remaining -= 1;

            match fetch_status(&state.client, &state.url).await {
                Ok(event) => {
                    state.last_progress = event.progress;
                    if event.phase.is_terminal() {
                        state.done = true;
                    }
                    Some((Ok(event), state))
                }
                Err(err) => {
                    state.done = true;
                    Some((Err(err), state))
                }
            }
        })))
    }
}

async fn fetch_status(client: &reqwest::Client, url: &str) -> Result<StatusEvent, TransportError> {
    let response = client.get(url).send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::HttpStatus(status.as_u16()));
    }

    // A poll tick has no later messages to fall back on, so an undecodable
    // body is a transport failure here, not a skippable message.
    let body = response.text().await.map_err(map_reqwest_error)?;
    StatusEventWire::decode(&body).map_err(|err| TransportError::Read(err.to_string()))
}
