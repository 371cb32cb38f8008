use crate::SectionKey;

/// Lifecycle stage of a job as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    ProcessingPdf,
    ProcessingImage { current: u32, total: u32 },
    Analyzing(SectionKey),
    /// Fallback for status tags this client does not recognize.
    Processing,
    Completed,
    Failed,
}

impl Phase {
    /// Parses the wire `status` tag into a typed phase.
    ///
    /// Tag grammar: `validating`, `processing_pdf`,
    /// `processing_image_{current}/{total}`, `analyzing_{section}`,
    /// `completed`, `error`. Anything else maps to [`Phase::Processing`]
    /// rather than failing; the server may grow new tags.
    pub fn parse(tag: &str) -> Phase {
        match tag {
            "validating" => Phase::Validating,
            "processing_pdf" => Phase::ProcessingPdf,
            "completed" => Phase::Completed,
            "error" => Phase::Failed,
            _ => {
                if let Some(counts) = tag.strip_prefix("processing_image_") {
                    return parse_image_counts(counts).unwrap_or(Phase::Processing);
                }
                if let Some(name) = tag.strip_prefix("analyzing_") {
                    return SectionKey::from_wire_name(name)
                        .map(Phase::Analyzing)
                        .unwrap_or(Phase::Processing);
                }
                Phase::Processing
            }
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

fn parse_image_counts(counts: &str) -> Option<Phase> {
    let (current, total) = counts.split_once('/')?;
    Some(Phase::ProcessingImage {
        current: current.parse().ok()?,
        total: total.parse().ok()?,
    })
}
