use analyzer_core::GENERIC_FAILURE_MESSAGE;

/// Connection-level failure. These are the only errors the retry loop acts
/// on; application-level failures arrive as `Phase::Failed` status events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("read error: {0}")]
    Read(String),
    #[error("stream ended before a terminal event")]
    ClosedEarly,
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    if err.is_connect() {
        return TransportError::Connect(err.to_string());
    }
    TransportError::Read(err.to_string())
}

/// Failure of the initial `POST /analyze`. Never retried: the job was not
/// accepted, so there is nothing to track.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Non-success response; `message` is the server's `detail` when the
    /// body decodes, otherwise the raw body text.
    #[error("submission rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl SubmitError {
    /// The message to surface to the user: the server's own words when it
    /// gave any, the generic localized fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
