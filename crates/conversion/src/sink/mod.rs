//! Exchange rate sinks

mod json_lines;
mod memory;

pub use json_lines::JsonLinesSink;
pub use memory::MemorySink;
