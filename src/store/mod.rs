pub mod seed;
pub mod sqlite;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::core::PillRecord;
use crate::error::Result;

pub use seed::seed_pills;
pub use sqlite::SqlitePillStore;

/// Trait for local pill collections.
///
/// Reads hand out an immutable snapshot; writes publish a new snapshot rather
/// than mutating the one readers hold.
#[async_trait]
pub trait PillStore: Send + Sync {
    /// Every stored pill, in id order
    async fn all(&self) -> Result<Arc<Vec<PillRecord>>>;

    /// Append one pill, skipping duplicates
    async fn insert(&self, pill: PillRecord) -> Result<InsertOutcome>;

    /// Append many pills in one transaction
    async fn insert_many(&self, pills: Vec<PillRecord>) -> Result<ImportSummary>;

    /// Get store statistics
    async fn stats(&self) -> Result<StoreStats>;
}

/// Result of a single insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored under the new id
    Inserted(i64),
    /// Same imprint, drug and strength already stored under this id
    Duplicate(i64),
}

/// Result of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_pills: u64,
    pub distinct_imprints: u64,
    pub last_added: Option<chrono::DateTime<chrono::Utc>>,
}

/// Read a JSON array of pill records (the `pills.json` export format)
pub fn read_json_file(path: impl AsRef<Path>) -> Result<Vec<PillRecord>> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let pills: Vec<PillRecord> = serde_json::from_str(&raw)?;
    Ok(pills)
}
