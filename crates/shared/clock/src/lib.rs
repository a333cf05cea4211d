//! Crossrate Clock Infrastructure
//!
//! Time sources for snapshot `received_at` and rate `computed_at` stamps:
//!
//! - [`SystemClock`]: wall-clock UTC, used by the runner
//! - [`FixedClock`]: frozen time that tests set and advance explicitly

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use crossrate_ports::Clock;
