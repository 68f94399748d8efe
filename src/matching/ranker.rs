use crate::config::MatchConfig;
use crate::core::{PillQuery, PillRecord, ScoredCandidate};
use crate::matching::attributes::{imprint_score, AttributeFilters, AttributeScores};

/// Trait for candidate ranking implementations
pub trait Ranker: Send + Sync {
    /// Score, filter and order candidates, best first, at most `limit`
    fn rank(&self, query: &PillQuery, candidates: &[PillRecord], limit: usize) -> Vec<ScoredCandidate>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Fixed-weight ranker: imprint dominates, color and shape refine.
///
/// Pure: no I/O, inputs untouched, identical inputs give identical output.
/// The config is used as given; [`PillEngine`](crate::PillEngine) validates it
/// before building a ranker, direct callers should run [`MatchConfig::validate`].
#[derive(Debug, Clone, Default)]
pub struct WeightedRanker {
    config: MatchConfig,
}

impl WeightedRanker {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Sub-scores of a single candidate against a query
    pub fn score(&self, query: &PillQuery, pill: &PillRecord) -> AttributeScores {
        let filters = AttributeFilters::new(query.color.as_deref(), query.shape.as_deref());
        self.score_with(&query.normalized_imprint(), &filters, pill)
    }

    fn score_with(&self, imprint: &str, filters: &AttributeFilters, pill: &PillRecord) -> AttributeScores {
        AttributeScores {
            imprint: imprint_score(imprint, &pill.imprint, &self.config),
            color: filters.color_score(&pill.color, &self.config),
            shape: filters.shape_score(&pill.shape, &self.config),
        }
    }
}

impl Ranker for WeightedRanker {
    fn rank(&self, query: &PillQuery, candidates: &[PillRecord], limit: usize) -> Vec<ScoredCandidate> {
        let imprint = query.normalized_imprint();
        if imprint.is_empty() {
            return Vec::new();
        }

        let filters = AttributeFilters::new(query.color.as_deref(), query.shape.as_deref());

        let mut ranked: Vec<ScoredCandidate> = candidates
            .iter()
            .filter_map(|pill| {
                let confidence = self.score_with(&imprint, &filters, pill).weighted(&self.config);
                (confidence >= self.config.min_confidence)
                    .then(|| ScoredCandidate::new(pill.clone(), confidence))
            })
            .collect();

        // Stable: equal confidences keep pool order
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(limit);

        ranked
    }

    fn name(&self) -> &str {
        "weighted"
    }
}
