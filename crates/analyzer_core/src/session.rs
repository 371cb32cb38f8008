use crate::{Phase, ResultModel, SectionMap, StatusEvent};

/// Shown when a failure carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Lỗi khi phân tích file";

/// Session lifecycle. Exactly one terminal transition fires per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Tracking,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Cancelled
        )
    }
}

/// Caller-facing notifications raised while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Displayed progress; `percent` is clamped to 0..=100 but may move
    /// backwards between ticks.
    Progress { percent: u32, phase: Phase },
    /// The transport dropped and a reconnect is pending.
    Retrying { attempt: u32, max_retries: u32 },
    /// The accumulated sections changed. `first_content` marks the tick
    /// that makes the results panel worth revealing.
    PartialUpdate {
        sections: SectionMap,
        first_content: bool,
    },
    Completed { result: SectionMap },
    Failed { message: String },
}

/// State for one logical analysis session.
///
/// The model owns its [`ResultModel`] exclusively; nothing here is shared
/// across sessions. All transitions are pure so the orchestration layer can
/// drive them from any transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionModel {
    state: SessionState,
    results: ResultModel,
    job_id: Option<String>,
    progress: u32,
}

impl SessionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn results(&self) -> &ResultModel {
        &self.results
    }

    /// Idle -> Submitting. Returns false if the session already left Idle.
    pub fn begin_submit(&mut self) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.state = SessionState::Submitting;
        true
    }

    /// Submitting -> Tracking, once the service has assigned a job id.
    pub fn begin_tracking(&mut self, job_id: impl Into<String>) -> bool {
        if self.state != SessionState::Submitting {
            return false;
        }
        self.job_id = Some(job_id.into());
        self.state = SessionState::Tracking;
        true
    }

    /// Terminal failure raised by the orchestration layer (submit rejection,
    /// retry exhaustion). No-op once the session is already terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> Vec<SessionEvent> {
        if self.state.is_terminal() || self.state == SessionState::Idle {
            return Vec::new();
        }
        self.state = SessionState::Failed;
        vec![SessionEvent::Failed {
            message: message.into(),
        }]
    }

    /// Explicit cancel. Valid while Submitting or Tracking; afterwards the
    /// model ignores every further status event.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            SessionState::Submitting | SessionState::Tracking => {
                self.state = SessionState::Cancelled;
                true
            }
            _ => false,
        }
    }

    /// Folds one decoded status event into the session.
    ///
    /// Events arriving outside Tracking (after cancel, or duplicate
    /// terminals replayed by a reconnected transport) produce nothing and
    /// mutate nothing.
    pub fn apply_status(&mut self, event: StatusEvent) -> Vec<SessionEvent> {
        if self.state != SessionState::Tracking {
            return Vec::new();
        }

        let mut out = Vec::new();
        self.progress = event.progress.min(100);
        out.push(SessionEvent::Progress {
            percent: self.progress,
            phase: event.phase,
        });

        if let Some(partial) = &event.partial {
            let merged = self.results.merge(partial);
            if merged.changed {
                out.push(SessionEvent::PartialUpdate {
                    sections: self.results.sections().clone(),
                    first_content: merged.first_content,
                });
            }
        }

        match event.phase {
            Phase::Completed => {
                // Prefer the server's final result, falling back to what
                // accumulated from partials if the server omitted it.
                if let Some(result) = &event.result {
                    self.results.merge(result);
                }
                self.state = SessionState::Completed;
                out.push(SessionEvent::Completed {
                    result: self.results.sections().clone(),
                });
            }
            Phase::Failed => {
                self.state = SessionState::Failed;
                let message = event
                    .error
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                out.push(SessionEvent::Failed { message });
            }
            _ => {}
        }

        out
    }
}
