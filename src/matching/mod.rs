//! Imprint/color/shape matching: normalization, edit distance, attribute
//! scoring, weighted ranking and exact/potential partitioning.
//!
//! All of it is pure and synchronous, safe to call from any number of
//! requests at once.

pub mod attributes;
pub mod distance;
pub mod normalize;
pub mod partition;
pub mod ranker;

pub use attributes::{imprint_score, resolve_shape_aliases, AttributeFilters, AttributeScores};
pub use distance::{
    fuzzy_imprint_score, fuzzy_imprint_score_with, levenshtein_distance, DEFAULT_SUBSTRING_SIMILARITY,
};
pub use normalize::{normalize_filter_value, normalize_imprint};
pub use partition::{difference_explanation, partition};
pub use ranker::{Ranker, WeightedRanker};
