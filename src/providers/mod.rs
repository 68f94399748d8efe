pub mod remote;

use async_trait::async_trait;
use crate::core::PillRecord;
use crate::error::Result;

pub use remote::RemotePillProvider;

/// Trait for live candidate suppliers.
///
/// Implementations return records with `Unknown` defaults already applied;
/// the engine ranks them, providers do not need to.
#[async_trait]
pub trait PillProvider: Send + Sync {
    /// Candidate pills for an imprint, at most `limit`
    async fn search(&self, imprint: &str, limit: usize) -> Result<Vec<PillRecord>>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;
}
