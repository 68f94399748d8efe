use crate::config::MatchConfig;
use crate::core::{PartitionedResults, PillRecord, ScoredCandidate};
use crate::matching::attributes::AttributeFilters;

/// Split ranked candidates into exact and potential matches.
///
/// A candidate is exact when it satisfies every supplied filter. Each bucket
/// keeps at most its configured size; overflow is dropped, never moved to the
/// other bucket.
pub fn partition(
    ranked: &[ScoredCandidate],
    color: Option<&str>,
    shape: Option<&str>,
    config: &MatchConfig,
) -> PartitionedResults {
    let filters = AttributeFilters::new(color, shape);
    let mut results = PartitionedResults::default();

    for candidate in ranked {
        let pill = &candidate.pill;
        if filters.color_matches(&pill.color) && filters.shape_matches(&pill.shape) {
            if results.exact_matches.len() < config.max_exact {
                results.exact_matches.push(candidate.clone());
            }
        } else if results.potential_matches.len() < config.max_potential {
            results.potential_matches.push(candidate.clone());
        }
    }

    results
}

/// Human-readable reason a candidate is only a potential match.
///
/// e.g. "Different color (this pill is Blue) and shape (this pill is Round)."
/// Empty when every supplied filter matches.
pub fn difference_explanation(pill: &PillRecord, color: Option<&str>, shape: Option<&str>) -> String {
    let filters = AttributeFilters::new(color, shape);
    let mut parts = Vec::new();

    if !filters.color_matches(&pill.color) {
        parts.push(format!("color (this pill is {})", pill.color));
    }
    if !filters.shape_matches(&pill.shape) {
        parts.push(format!("shape (this pill is {})", pill.shape));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("Different {}.", parts.join(" and "))
    }
}
