//! # Pill Identifier Engine
//!
//! Identifies pills from their imprint code, with optional color and shape:
//! - Imprint normalization and Levenshtein-based fuzzy scoring
//! - Weighted imprint/color/shape ranking with shape synonyms
//! - Exact vs potential match partitioning
//! - Live JSON providers with SQLite-backed local fallback store
//! - Multiple interfaces: Rust library, Python bindings, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pill_identifier_engine::{PillEngine, PillQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = PillEngine::new("data/pills.db").await?;
//!
//!     let response = engine
//!         .identify(PillQuery::new("L 484").with_color("white").with_shape("capsule"))
//!         .await?;
//!
//!     for entry in &response.results {
//!         println!("{} - {}%", entry.pill.display_name(), entry.confidence);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod matching;
pub mod providers;
pub mod store;

// Re-export primary types
pub use crate::core::{
    IdentifyResponse, MatchEntry, PartitionedResults, PillQuery, PillRecord, ResultSource,
    ScoredCandidate,
};
pub use config::{EngineConfig, MatchConfig};
pub use engine::{PillEngine, SearchOptions};
pub use error::{PillEngineError, Result};
pub use matching::{Ranker, WeightedRanker};
pub use store::{PillStore, SqlitePillStore};

// Python bindings
#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
pub use python::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
