use std::time::Duration;

use thiserror::Error;

use crossrate_core::{ConversionRoute, PairId};
use crossrate_ports::{PairSource, PairSourceError};

/// Startup failures; any of them stops the process before a stream starts
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Pair discovery failed: {0}")]
    Discovery(#[from] PairSourceError),

    #[error("Pair discovery timed out after {0:?}")]
    Timeout(Duration),

    #[error("No trading pairs available")]
    NoPairs,
}

/// Fetch the pairs to stream, bounded by `timeout`.
///
/// An empty list is an error: there would be nothing to supervise.
pub async fn discover_pairs(
    source: &dyn PairSource,
    timeout: Duration,
) -> Result<Vec<PairId>, BootstrapError> {
    let pairs = tokio::time::timeout(timeout, source.fetch_pairs())
        .await
        .map_err(|_| BootstrapError::Timeout(timeout))??;

    if pairs.is_empty() {
        return Err(BootstrapError::NoPairs);
    }

    tracing::info!(count = pairs.len(), "Discovered trading pairs");
    Ok(pairs)
}

/// Route pairs missing from the discovered list; rates cannot be computed
/// until they appear.
pub fn missing_route_pairs(route: &ConversionRoute, pairs: &[PairId]) -> Vec<PairId> {
    [&route.source, &route.target]
        .into_iter()
        .filter(|pair| !pairs.contains(*pair))
        .cloned()
        .collect()
}
