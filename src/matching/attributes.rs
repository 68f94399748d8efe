//! Independent imprint, color and shape sub-scores.
//!
//! Nothing here is weighted; [`AttributeScores::weighted`] combines them.
//! Color and shape mismatches score `mismatch_penalty` instead of zero so a
//! misreported attribute never hides an otherwise plausible pill.

use crate::config::MatchConfig;
use crate::matching::{fuzzy_imprint_score_with, normalize_filter_value, normalize_imprint};

/// Shape synonym classes, in normalized form
const SHAPE_ALIASES: &[&[&str]] = &[
    &["capsule", "oblong", "capsule/oblong"],
    &["round", "circle"],
    &["oval", "ellipse"],
];

/// Terms a normalized shape filter may match: its alias class, or itself
pub fn resolve_shape_aliases(normalized_shape: &str) -> Vec<String> {
    SHAPE_ALIASES
        .iter()
        .find(|class| class.contains(&normalized_shape))
        .map(|class| class.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec![normalized_shape.to_string()])
}

/// Imprint sub-score, tiered.
///
/// `query` must already be normalized with [`normalize_imprint`].
pub fn imprint_score(query: &str, candidate_imprint: &str, config: &MatchConfig) -> f64 {
    let candidate = normalize_imprint(candidate_imprint);

    if candidate == query {
        return 1.0;
    }
    if candidate.contains(query) {
        return config.contained_imprint_score;
    }

    let query_contains_candidate = query.contains(candidate.as_str());
    let candidate_len = candidate.chars().count();

    if query_contains_candidate && candidate_len >= config.min_containing_imprint_len {
        return config.containing_imprint_score;
    }

    let score = fuzzy_imprint_score_with(query, &candidate, config.substring_similarity);
    if query_contains_candidate && candidate_len <= 2 {
        score.min(config.short_imprint_cap)
    } else {
        score
    }
}

/// Normalized color/shape filters of one query.
///
/// Blank filters are treated as absent and match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeFilters {
    color: Option<String>,
    shape_terms: Option<Vec<String>>,
}

impl AttributeFilters {
    pub fn new(color: Option<&str>, shape: Option<&str>) -> Self {
        let color = color.map(normalize_filter_value).filter(|c| !c.is_empty());
        let shape_terms = shape
            .map(normalize_filter_value)
            .filter(|s| !s.is_empty())
            .map(|s| resolve_shape_aliases(&s));

        Self { color, shape_terms }
    }

    /// Filters that accept every candidate
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    pub fn has_shape(&self) -> bool {
        self.shape_terms.is_some()
    }

    /// Either color string contains the other
    pub fn color_matches(&self, candidate_color: &str) -> bool {
        let Some(wanted) = &self.color else {
            return true;
        };
        let actual = normalize_filter_value(candidate_color);
        actual.contains(wanted.as_str()) || wanted.contains(actual.as_str())
    }

    /// Some alias term and some candidate term contain one another.
    ///
    /// A blank candidate shape yields one empty term and matches, like a blank color.
    pub fn shape_matches(&self, candidate_shape: &str) -> bool {
        let Some(terms) = &self.shape_terms else {
            return true;
        };
        let actual = normalize_filter_value(candidate_shape);
        let candidate_terms: Vec<&str> = actual
            .split(|c: char| c.is_whitespace() || c == '/')
            .collect();

        terms.iter().any(|term| {
            candidate_terms
                .iter()
                .any(|part| part.contains(term.as_str()) || term.contains(*part))
        })
    }

    pub fn color_score(&self, candidate_color: &str, config: &MatchConfig) -> f64 {
        if self.color_matches(candidate_color) {
            1.0
        } else {
            config.mismatch_penalty
        }
    }

    pub fn shape_score(&self, candidate_shape: &str, config: &MatchConfig) -> f64 {
        if self.shape_matches(candidate_shape) {
            1.0
        } else {
            config.mismatch_penalty
        }
    }
}

/// The three sub-scores of one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeScores {
    pub imprint: f64,
    pub color: f64,
    pub shape: f64,
}

impl AttributeScores {
    /// Weighted confidence
    pub fn weighted(&self, config: &MatchConfig) -> f64 {
        self.imprint * config.imprint_weight
            + self.color * config.color_weight
            + self.shape * config.shape_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn test_imprint_tiers() {
        let c = config();
        assert_eq!(imprint_score("L484", "l 484", &c), 1.0);
        // candidate contains the (truncated) query
        assert_eq!(imprint_score("L48", "L484", &c), 0.85);
        // query contains a candidate of 3+ characters
        assert_eq!(imprint_score("L4842", "L484", &c), 0.7);
        assert_eq!(imprint_score("IP109", "109", &c), 0.7);
    }

    #[test]
    fn test_imprint_short_candidate_capped() {
        let c = config();
        // "M" is inside "M367": fuzzy would say 0.9, the cap keeps it at 0.4
        assert_eq!(imprint_score("M367", "M", &c), 0.4);
        assert_eq!(imprint_score("M367", "67", &c), 0.4);
    }

    #[test]
    fn test_imprint_fuzzy_fallback() {
        let c = config();
        assert!((imprint_score("L485", "L484", &c) - 0.75).abs() < 1e-12);
        assert_eq!(imprint_score("L484", "M367", &c), 0.0);
    }

    #[test]
    fn test_color_matching() {
        let c = config();
        let filters = AttributeFilters::new(Some(" WHITE "), None);
        assert!(filters.color_matches("White"));
        assert!(filters.color_matches("White & Blue"));
        assert_eq!(filters.color_score("Blue", &c), 0.3);

        let partial = AttributeFilters::new(Some("light blue"), None);
        assert!(partial.color_matches("Blue"));
    }

    #[test]
    fn test_no_filters_are_neutral() {
        let c = config();
        for filters in [AttributeFilters::none(), AttributeFilters::new(Some("  "), Some(""))] {
            assert!(!filters.has_color());
            assert!(!filters.has_shape());
            assert_eq!(filters.color_score("Purple", &c), 1.0);
            assert_eq!(filters.shape_score("Hexagon", &c), 1.0);
        }
    }

    #[test]
    fn test_shape_aliases() {
        let filters = AttributeFilters::new(None, Some("capsule"));
        assert!(filters.shape_matches("Oblong"));
        assert!(filters.shape_matches("Capsule/Oblong"));
        assert!(!filters.shape_matches("Round"));

        assert!(AttributeFilters::new(None, Some("Circle")).shape_matches("Round"));
        assert!(AttributeFilters::new(None, Some("round")).shape_matches("circle"));
        assert!(AttributeFilters::new(None, Some("ellipse")).shape_matches("Oval"));
        assert!(AttributeFilters::new(None, Some("Capsule / Oblong")).shape_matches("oblong"));
    }

    #[test]
    fn test_shape_unknown_filter_matches_itself() {
        let c = config();
        let filters = AttributeFilters::new(None, Some("hexagon"));
        assert_eq!(filters.shape_score("6-sided Hexagon", &c), 1.0);
        assert_eq!(filters.shape_score("Round", &c), 0.3);
    }

    #[test]
    fn test_blank_candidate_color_matches() {
        let filters = AttributeFilters::new(Some("white"), None);
        assert!(filters.color_matches(""));
        assert!(filters.color_matches("   "));
    }

    #[test]
    fn test_blank_candidate_shape_matches() {
        let c = config();
        let filters = AttributeFilters::new(None, Some("hexagon"));
        assert!(filters.shape_matches(""));
        assert_eq!(filters.shape_score(" ", &c), 1.0);
        assert!(AttributeFilters::new(None, Some("capsule")).shape_matches(""));
    }

    #[test]
    fn test_resolve_shape_aliases() {
        assert_eq!(resolve_shape_aliases("oblong"), vec!["capsule", "oblong", "capsule/oblong"]);
        assert_eq!(resolve_shape_aliases("square"), vec!["square"]);
    }

    #[test]
    fn test_weighted() {
        let scores = AttributeScores { imprint: 1.0, color: 0.3, shape: 1.0 };
        assert!((scores.weighted(&config()) - 0.86).abs() < 1e-9);
    }
}
