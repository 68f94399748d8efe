pub mod pill_record;
pub mod query;
pub mod search_response;

pub use pill_record::{or_unknown, reference_image_for, PillRecord, UNKNOWN};
pub use query::PillQuery;
pub use search_response::{
    IdentifyResponse, MatchEntry, PartitionedResults, ResultSource, ScoredCandidate, DISCLAIMER,
};
