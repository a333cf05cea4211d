use async_trait::async_trait;
use crossrate_core::PairId;

use crate::error::PairSourceError;

/// Supplies the initial set of currency pairs to subscribe to
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Usable pair identifiers: blank names already filtered out.
    /// An empty list is a valid answer; deciding whether it is fatal is
    /// left to the caller.
    async fn fetch_pairs(&self) -> Result<Vec<PairId>, PairSourceError>;
}
