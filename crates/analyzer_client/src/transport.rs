use std::pin::Pin;

use futures_util::Stream;

use analyzer_core::StatusEvent;

use crate::TransportError;

/// Lazy sequence of decoded status events for one transport attempt.
///
/// Ends after the terminal event, when the connection closes, or with a
/// single `Err` item on a connection-level failure.
pub type StatusStream = Pin<Box<dyn Stream<Item = Result<StatusEvent, TransportError>> + Send>>;

/// Capability to follow a server-side job.
///
/// Both transports implement this so the retry loop and the session stay
/// transport-agnostic; each `open` call is one independent attempt.
#[async_trait::async_trait]
pub trait JobTracker: Send + Sync {
    async fn open(&self, job_id: &str) -> Result<StatusStream, TransportError>;
}
