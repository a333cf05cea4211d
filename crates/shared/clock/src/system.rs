use chrono::Utc;
use crossrate_core::Timestamp;
use crossrate_ports::Clock;

/// Wall-clock time source
///
/// Stamps snapshots and rates with the current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread;

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock::new();
        let before = clock.now();
        thread::sleep(std::time::Duration::from_millis(10));
        let after = clock.now();

        assert!(after - before >= Duration::milliseconds(9));
    }
}
