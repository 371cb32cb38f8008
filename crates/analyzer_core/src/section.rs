use std::fmt;

/// The five fixed sections of a contract analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Benefits,
    Costs,
    SurrenderValue,
    Exclusions,
    ClaimProcess,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Benefits,
        SectionKey::Costs,
        SectionKey::SurrenderValue,
        SectionKey::Exclusions,
        SectionKey::ClaimProcess,
    ];

    /// The exact key used by the remote service. Must be preserved
    /// byte-for-byte for wire compatibility.
    pub fn wire_name(self) -> &'static str {
        match self {
            SectionKey::Benefits => "quyền_lợi",
            SectionKey::Costs => "chi_phí_tổng_thể_hàng_năm",
            SectionKey::SurrenderValue => "giá_trị_hoàn_lại",
            SectionKey::Exclusions => "các_điều_khoản_loại_trừ",
            SectionKey::ClaimProcess => "quy_trình_claim",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<SectionKey> {
        SectionKey::ALL.into_iter().find(|key| key.wire_name() == name)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Sparse mapping from section keys to raw section text.
///
/// Absent or empty text means "not yet available"; the wire format has no
/// way to express an intentionally empty section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionMap {
    benefits: Option<String>,
    costs: Option<String>,
    surrender_value: Option<String>,
    exclusions: Option<String>,
    claim_process: Option<String>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SectionKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: SectionKey, text: impl Into<String>) {
        *self.slot_mut(key) = Some(text.into());
    }

    /// Builder-style `set`, mostly for assembling fixtures and defaults.
    pub fn with(mut self, key: SectionKey, text: impl Into<String>) -> Self {
        self.set(key, text);
        self
    }

    /// Iterates the sections that currently hold non-empty text, in the
    /// fixed key order.
    pub fn filled(&self) -> impl Iterator<Item = (SectionKey, &str)> + '_ {
        SectionKey::ALL.into_iter().filter_map(|key| {
            self.get(key)
                .filter(|text| !text.is_empty())
                .map(|text| (key, text))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.filled().next().is_none()
    }

    fn slot(&self, key: SectionKey) -> &Option<String> {
        match key {
            SectionKey::Benefits => &self.benefits,
            SectionKey::Costs => &self.costs,
            SectionKey::SurrenderValue => &self.surrender_value,
            SectionKey::Exclusions => &self.exclusions,
            SectionKey::ClaimProcess => &self.claim_process,
        }
    }

    fn slot_mut(&mut self, key: SectionKey) -> &mut Option<String> {
        match key {
            SectionKey::Benefits => &mut self.benefits,
            SectionKey::Costs => &mut self.costs,
            SectionKey::SurrenderValue => &mut self.surrender_value,
            SectionKey::Exclusions => &mut self.exclusions,
            SectionKey::ClaimProcess => &mut self.claim_process,
        }
    }
}

/// What a merge did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// At least one key now holds different text than before.
    pub changed: bool,
    /// This merge produced the model's first non-empty section.
    pub first_content: bool,
}

/// Accumulator for one job's analysis sections.
///
/// Merge policy: last-non-empty-write-wins per key. An empty or absent
/// incoming value never erases text already held, so applying partial
/// results out of order or more than once cannot regress the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultModel {
    sections: SectionMap,
    has_any_content: bool,
}

impl ResultModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    /// True once at least one section holds text. Presentation uses this
    /// to keep the results panel hidden until there is something to show.
    pub fn has_any_content(&self) -> bool {
        self.has_any_content
    }

    pub fn merge(&mut self, incoming: &SectionMap) -> MergeOutcome {
        let mut changed = false;
        for key in SectionKey::ALL {
            let Some(text) = incoming.get(key) else {
                continue;
            };
            if text.is_empty() || self.sections.get(key) == Some(text) {
                continue;
            }
            self.sections.set(key, text);
            changed = true;
        }
        // Any change writes non-empty text, so change implies content.
        let first_content = changed && !self.has_any_content;
        if changed {
            self.has_any_content = true;
        }
        MergeOutcome {
            changed,
            first_content,
        }
    }
}
