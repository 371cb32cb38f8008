use std::time::Duration;

use client_logging::{client_info, client_warn};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use analyzer_core::{
    SectionMap, SessionEvent, SessionModel, SessionState, GENERIC_FAILURE_MESSAGE,
};

use crate::poll::{PollSettings, PollTransport};
use crate::retry::{RetryController, RetryPolicy};
use crate::stream::{StreamSettings, StreamTransport};
use crate::submit::{submit, SubmitPayload};
use crate::transport::JobTracker;
use crate::TransportError;

/// Surfaced when the retry ceiling is exhausted without reconnecting.
pub const CONNECTION_FAILURE_MESSAGE: &str =
    "Không thể kết nối với máy chủ sau nhiều lần thử lại";

/// Which transport follows the job. An explicit configuration axis; there
/// is no hidden mid-session fallback from one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Stream,
    Poll,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub base_url: String,
    pub transport: TransportKind,
    pub retry: RetryPolicy,
    pub stream: StreamSettings,
    pub poll: PollSettings,
    /// Overall deadline for the submit request, connection included.
    pub submit_timeout: Duration,
}

impl SessionSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: TransportKind::default(),
            retry: RetryPolicy::default(),
            stream: StreamSettings::default(),
            poll: PollSettings::default(),
            submit_timeout: Duration::from_secs(30),
        }
    }
}

/// Receives caller-facing session events as they happen.
pub trait SessionSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// Sink that forwards events into an unbounded channel, for consumers that
/// render from their own loop.
pub struct ChannelSessionSink {
    tx: tokio::sync::mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSessionSink {
    pub fn channel() -> (Self, tokio::sync::mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SessionSink for ChannelSessionSink {
    fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

/// How the session ended. Mirrors the terminal `SessionEvent` (or its
/// absence, for a cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(SectionMap),
    Failed { message: String },
    Cancelled,
}

/// Orchestrates one analysis job: submit, then follow it over exactly one
/// open transport at a time, retrying through connection failures until a
/// terminal event, exhaustion, or cancel.
pub struct JobSession {
    settings: SessionSettings,
    model: SessionModel,
    cancel: CancellationToken,
}

impl JobSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            model: SessionModel::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Handle for cancelling the session from outside `run`. Cancellation
    /// is honored at every suspension point; no caller-visible event fires
    /// after it.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(mut self, payload: SubmitPayload, sink: impl SessionSink) -> SessionOutcome {
        self.model.begin_submit();

        let submit_client = match reqwest::Client::builder()
            .timeout(self.settings.submit_timeout)
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                client_warn!("http client construction failed: {err}");
                return self.fail(GENERIC_FAILURE_MESSAGE.to_string(), &sink);
            }
        };

        let cancel = self.cancel.clone();
        let base_url = self.settings.base_url.clone();
        let job_id = tokio::select! {
            _ = cancel.cancelled() => return self.cancelled(),
            submitted = submit(&submit_client, &base_url, payload) => {
                match submitted {
                    Ok(job_id) => job_id,
                    Err(err) => {
                        client_warn!("submission failed: {err}");
                        return self.fail(err.user_message(), &sink);
                    }
                }
            }
        };

        client_info!("job {job_id} accepted, tracking via {:?}", self.settings.transport);
        self.model.begin_tracking(job_id.as_str());

        let tracker: Box<dyn JobTracker> = match self.build_tracker() {
            Ok(tracker) => tracker,
            Err(err) => {
                client_warn!("transport construction failed: {err}");
                return self.fail(CONNECTION_FAILURE_MESSAGE.to_string(), &sink);
            }
        };

        let mut retry = RetryController::new(self.settings.retry);
        loop {
            match self.track_attempt(tracker.as_ref(), &job_id, &mut retry, &sink).await {
                Ok(outcome) => return outcome,
                Err(err) => {
                    client_warn!("transport failure on job {job_id}: {err}");
                    let Some(grant) = retry.next_attempt() else {
                        return self.fail(CONNECTION_FAILURE_MESSAGE.to_string(), &sink);
                    };
                    sink.emit(SessionEvent::Retrying {
                        attempt: grant.attempt,
                        max_retries: grant.max_retries,
                    });
                    tokio::select! {
                        _ = cancel.cancelled() => return self.cancelled(),
                        _ = tokio::time::sleep(grant.delay) => {}
                    }
                }
            }
        }
    }

    fn build_tracker(&self) -> Result<Box<dyn JobTracker>, TransportError> {
        Ok(match self.settings.transport {
            TransportKind::Stream => Box::new(StreamTransport::new(
                self.settings.base_url.as_str(),
                self.settings.stream.clone(),
            )?),
            TransportKind::Poll => Box::new(PollTransport::new(
                self.settings.base_url.as_str(),
                self.settings.poll.clone(),
            )?),
        })
    }

    /// One transport attempt: open a fresh connection and drain its events.
    /// Returning `Err` hands control to the retry ladder; the exhausted
    /// stream is dropped before the next attempt opens, so at most one
    /// connection exists at any instant.
    async fn track_attempt(
        &mut self,
        tracker: &dyn JobTracker,
        job_id: &str,
        retry: &mut RetryController,
        sink: &dyn SessionSink,
    ) -> Result<SessionOutcome, TransportError> {
        let cancel = self.cancel.clone();
        let mut events = tokio::select! {
            _ = cancel.cancelled() => return Ok(self.cancelled()),
            opened = tracker.open(job_id) => opened?,
        };

        loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => return Ok(self.cancelled()),
                item = events.next() => item,
            };

            match item {
                Some(Ok(status)) => {
                    retry.record_success();
                    let mut failure = None;
                    for event in self.model.apply_status(status) {
                        if let SessionEvent::Failed { message } = &event {
                            failure = Some(message.clone());
                        }
                        sink.emit(event);
                    }
                    match self.model.state() {
                        SessionState::Completed => {
                            return Ok(SessionOutcome::Completed(
                                self.model.results().sections().clone(),
                            ));
                        }
                        SessionState::Failed => {
                            return Ok(SessionOutcome::Failed {
                                message: failure
                                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                            });
                        }
                        _ => {}
                    }
                }
                Some(Err(err)) => return Err(err),
                // The server closes the channel after the terminal event;
                // ending before one means the connection was cut.
                None => return Err(TransportError::ClosedEarly),
            }
        }
    }

    fn cancelled(&mut self) -> SessionOutcome {
        self.model.cancel();
        SessionOutcome::Cancelled
    }

    fn fail(&mut self, message: String, sink: &dyn SessionSink) -> SessionOutcome {
        for event in self.model.fail(message.as_str()) {
            sink.emit(event);
        }
        SessionOutcome::Failed { message }
    }
}
