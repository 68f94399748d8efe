use serde::{Deserialize, Serialize};
use crate::core::PillRecord;

/// Shown with every identification result
pub const DISCLAIMER: &str = "This tool is for informational purposes only and does not replace medical advice. Always consult a pharmacist or physician.";

/// A pill record annotated with its match confidence (0.0 - 1.0)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub pill: PillRecord,

    pub confidence: f64,
}

impl ScoredCandidate {
    pub fn new(pill: PillRecord, confidence: f64) -> Self {
        Self { pill, confidence }
    }

    /// Confidence as a rounded percentage for display
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Ranked candidates split by whether they agree with the color/shape filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionedResults {
    pub exact_matches: Vec<ScoredCandidate>,
    pub potential_matches: Vec<ScoredCandidate>,
}

impl PartitionedResults {
    pub fn is_empty(&self) -> bool {
        self.exact_matches.is_empty() && self.potential_matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exact_matches.len() + self.potential_matches.len()
    }
}

/// Where the candidate pool came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// A live provider answered
    Live,
    /// Local store fallback
    Local,
}

/// One displayed match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEntry {
    /// Record with `image_url` resolved to a reference image when missing
    #[serde(flatten)]
    pub pill: PillRecord,

    /// Confidence percentage (0 - 100)
    pub confidence: u8,

    /// Explanation of the mismatch, for potential matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<String>,
}

impl MatchEntry {
    pub fn from_candidate(candidate: &ScoredCandidate, difference: Option<String>) -> Self {
        let mut pill = candidate.pill.clone();
        pill.image_url = pill.reference_image_url();
        Self {
            pill,
            confidence: candidate.confidence_percent(),
            difference: difference.filter(|d| !d.is_empty()),
        }
    }
}

/// Identification response returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResponse {
    pub imprint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_shape: Option<String>,

    /// Exact matches
    pub results: Vec<MatchEntry>,

    /// Same imprint, different color and/or shape
    #[serde(default)]
    pub potential_matches: Vec<MatchEntry>,

    pub disclaimer: String,

    pub source: ResultSource,

    /// Identification latency in milliseconds
    pub latency_ms: f64,
}

impl IdentifyResponse {
    /// Best match across both buckets
    pub fn best(&self) -> Option<&MatchEntry> {
        self.results.first().or_else(|| self.potential_matches.first())
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        match self.best() {
            Some(best) => format!(
                "{} → {} - {}% ({} exact, {} potential) [{:?}]",
                self.imprint,
                best.pill.display_name(),
                best.confidence,
                self.results.len(),
                self.potential_matches.len(),
                self.source
            ),
            None => format!("{} → no matches [{:?}]", self.imprint, self.source),
        }
    }
}
