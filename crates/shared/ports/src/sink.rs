use crossrate_core::ExchangeRate;

use crate::error::SinkError;

/// Durable append-only store for emitted rates
///
/// Called synchronously from the computation cycle, which runs on the stream
/// supervisor's task. File-backed implementations block that task for the
/// duration of the write, so keep each append short; callers on a
/// multi-threaded runtime can wrap the cycle in `tokio::task::block_in_place`.
/// Implementations must not panic; failures are reported and the caller
/// decides what to log.
pub trait ExchangeRateSink: Send + Sync {
    fn append(&self, rate: &ExchangeRate) -> Result<(), SinkError>;
}
