use chrono::Duration;
use crossrate_core::Timestamp;
use crossrate_ports::Clock;
use parking_lot::RwLock;

/// Frozen clock for deterministic tests
///
/// Time only moves when [`FixedClock::set`] or [`FixedClock::advance`] is called.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        FixedClock {
            now: RwLock::new(at),
        }
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.write() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
