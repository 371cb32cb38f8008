use serde::Deserialize;

use analyzer_core::{Phase, SectionKey, SectionMap, StatusEvent};

/// Response body of a successful `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobCreatedWire {
    pub job_id: String,
}

/// Error body of a rejected `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DetailWire {
    pub detail: String,
}

/// Wire shape of a section map. The field names are the service's exact
/// keys and must not be touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionMapWire {
    #[serde(rename = "quyền_lợi", default)]
    pub benefits: Option<String>,
    #[serde(rename = "chi_phí_tổng_thể_hàng_năm", default)]
    pub costs: Option<String>,
    #[serde(rename = "giá_trị_hoàn_lại", default)]
    pub surrender_value: Option<String>,
    #[serde(rename = "các_điều_khoản_loại_trừ", default)]
    pub exclusions: Option<String>,
    #[serde(rename = "quy_trình_claim", default)]
    pub claim_process: Option<String>,
}

impl SectionMapWire {
    pub fn into_sections(self) -> SectionMap {
        let mut sections = SectionMap::new();
        let fields = [
            (SectionKey::Benefits, self.benefits),
            (SectionKey::Costs, self.costs),
            (SectionKey::SurrenderValue, self.surrender_value),
            (SectionKey::Exclusions, self.exclusions),
            (SectionKey::ClaimProcess, self.claim_process),
        ];
        for (key, value) in fields {
            if let Some(text) = value {
                sections.set(key, text);
            }
        }
        sections
    }
}

/// Wire shape of one status tick.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEventWire {
    #[serde(default)]
    pub progress: f64,
    pub status: String,
    #[serde(default)]
    pub partial_result: Option<SectionMapWire>,
    #[serde(default)]
    pub result: Option<SectionMapWire>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusEventWire {
    /// Lowers the wire event into the typed model, parsing the status tag
    /// at the boundary so nothing downstream touches raw strings.
    pub fn into_event(self) -> StatusEvent {
        StatusEvent {
            progress: clamp_progress(self.progress),
            phase: Phase::parse(&self.status),
            partial: self.partial_result.map(SectionMapWire::into_sections),
            result: self.result.map(SectionMapWire::into_sections),
            error: self.error,
        }
    }

    pub fn decode(json: &str) -> Result<StatusEvent, serde_json::Error> {
        serde_json::from_str::<StatusEventWire>(json).map(StatusEventWire::into_event)
    }
}

fn clamp_progress(progress: f64) -> u32 {
    if progress.is_finite() && progress > 0.0 {
        progress.round().min(100.0) as u32
    } else {
        0
    }
}
