//! Analyzer client: job submission, tracking transports, retry and session
//! orchestration for the remote contract-analysis service.
mod error;
mod poll;
mod retry;
mod session;
mod stream;
mod submit;
mod transport;
mod wire;

pub use error::{SubmitError, TransportError};
pub use poll::{PollSettings, PollTransport, POLL_TIMEOUT_MESSAGE};
pub use retry::{RetryAttempt, RetryController, RetryPolicy};
pub use session::{
    ChannelSessionSink, JobSession, SessionOutcome, SessionSettings, SessionSink, TransportKind,
    CONNECTION_FAILURE_MESSAGE,
};
pub use stream::{StreamSettings, StreamTransport};
pub use submit::{submit, FilePart, SubmitPayload};
pub use transport::{JobTracker, StatusStream};
pub use wire::{JobCreatedWire, SectionMapWire, StatusEventWire};
