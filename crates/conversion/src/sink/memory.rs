use parking_lot::Mutex;

use crossrate_core::ExchangeRate;
use crossrate_ports::{ExchangeRateSink, SinkError};

/// Keeps appended rates in memory, in append order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ExchangeRate>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ExchangeRate> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ExchangeRateSink for MemorySink {
    fn append(&self, rate: &ExchangeRate) -> Result<(), SinkError> {
        self.records.lock().push(rate.clone());
        Ok(())
    }
}
