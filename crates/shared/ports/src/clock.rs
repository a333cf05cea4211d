use crossrate_core::Timestamp;

/// Time source for `received_at` and `computed_at` stamps
///
/// Injected into the parser and the rate computer so tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Label used in diagnostics
    fn name(&self) -> &str {
        "Clock"
    }
}
