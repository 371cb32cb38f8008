use crate::{Phase, SectionMap};

/// One tick of job status, as decoded from the wire.
///
/// `progress` is not guaranteed to be monotonic by the source; consumers
/// must tolerate values that move backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub progress: u32,
    pub phase: Phase,
    /// Sparse sections delivered before completion, to be merged.
    pub partial: Option<SectionMap>,
    /// Full sections; present only when `phase` is `Completed`.
    pub result: Option<SectionMap>,
    /// Server-reported message; present only when `phase` is `Failed`.
    pub error: Option<String>,
}

impl StatusEvent {
    /// A bare progress tick with no sections attached.
    pub fn progress(progress: u32, phase: Phase) -> Self {
        Self {
            progress,
            phase,
            partial: None,
            result: None,
            error: None,
        }
    }
}
