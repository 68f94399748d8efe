//! Tuning parameters for the matcher and process settings for the engine.
//!
//! Every threshold the scorer uses lives in [`MatchConfig`] so tests can probe
//! boundaries without touching business defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PillEngineError, Result};

/// Scoring weights, tiers and caps for the matching engine.
///
/// # Examples
///
/// ```
/// use pill_identifier_engine::MatchConfig;
///
/// let config = MatchConfig::default();
/// assert_eq!(config.imprint_weight, 0.6);
/// assert_eq!(config.max_exact, 3);
///
/// let strict: MatchConfig = serde_json::from_str(r#"{"min_confidence": 0.5}"#).unwrap();
/// assert_eq!(strict.min_confidence, 0.5);
/// assert_eq!(strict.color_weight, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Weight of the imprint sub-score in the final confidence
    pub imprint_weight: f64,

    pub color_weight: f64,

    pub shape_weight: f64,

    /// Candidates below this confidence are dropped
    pub min_confidence: f64,

    /// Candidate imprint contains the query ("L48" vs "L484")
    pub contained_imprint_score: f64,

    /// Query contains the candidate imprint ("L4842" vs "L484")
    pub containing_imprint_score: f64,

    /// Shortest candidate imprint eligible for `containing_imprint_score`
    pub min_containing_imprint_len: usize,

    /// Substring relationship inside the edit-distance similarity
    pub substring_similarity: f64,

    /// Color/shape sub-score when the filter does not match
    pub mismatch_penalty: f64,

    /// Ceiling for imprints of 1-2 characters contained in the query
    pub short_imprint_cap: f64,

    /// Exact-match bucket size
    pub max_exact: usize,

    /// Potential-match bucket size
    pub max_potential: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            imprint_weight: 0.6,
            color_weight: 0.2,
            shape_weight: 0.2,
            min_confidence: 0.3,
            contained_imprint_score: 0.85,
            containing_imprint_score: 0.7,
            min_containing_imprint_len: 3,
            substring_similarity: 0.9,
            mismatch_penalty: 0.3,
            short_imprint_cap: 0.4,
            max_exact: 3,
            max_potential: 3,
        }
    }
}

impl MatchConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject weights and scores that would break the [0, 1] confidence range
    pub fn validate(&self) -> Result<()> {
        let unit_values = [
            ("imprint_weight", self.imprint_weight),
            ("color_weight", self.color_weight),
            ("shape_weight", self.shape_weight),
            ("min_confidence", self.min_confidence),
            ("contained_imprint_score", self.contained_imprint_score),
            ("containing_imprint_score", self.containing_imprint_score),
            ("substring_similarity", self.substring_similarity),
            ("mismatch_penalty", self.mismatch_penalty),
            ("short_imprint_cap", self.short_imprint_cap),
        ];

        for (name, value) in unit_values {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PillEngineError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let total = self.imprint_weight + self.color_weight + self.shape_weight;
        if total > 1.0 + 1e-9 {
            return Err(PillEngineError::InvalidConfig(format!(
                "weights sum to {}, must not exceed 1",
                total
            )));
        }

        Ok(())
    }
}

/// Process-level engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// SQLite file backing the local pill store
    pub db_path: String,

    /// Base URL of a live JSON pill source
    pub remote_url: Option<String>,

    /// Candidates requested from each source per identification
    pub fetch_limit: usize,

    /// Autocomplete size
    pub max_suggestions: usize,

    /// HTTP port for the server binary
    pub port: u16,

    /// Optional JSON file with [`MatchConfig`] overrides
    pub match_config_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: "data/pills.db".to_string(),
            remote_url: None,
            fetch_limit: 15,
            max_suggestions: 15,
            port: 8090,
            match_config_path: None,
        }
    }
}

impl EngineConfig {
    /// Read `DATABASE_PATH`, `PILL_SOURCE_URL`, `PORT` and `MATCH_CONFIG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            db_path: non_empty("DATABASE_PATH").unwrap_or(defaults.db_path),
            remote_url: non_empty("PILL_SOURCE_URL"),
            fetch_limit: non_empty("FETCH_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_limit),
            max_suggestions: defaults.max_suggestions,
            port: non_empty("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            match_config_path: non_empty("MATCH_CONFIG").map(PathBuf::from),
        }
    }

    /// Matching parameters, from `match_config_path` when set
    pub fn match_config(&self) -> Result<MatchConfig> {
        match &self.match_config_path {
            Some(path) => MatchConfig::from_json_file(path),
            None => Ok(MatchConfig::default()),
        }
    }
}
