//! Crossrate Runner
//!
//! Wires the streamer together:
//!
//! 1. Load configuration (file, embedded default, env overrides)
//! 2. Discover trading pairs over REST; no pairs means no start
//! 3. Start one stream supervisor per pair sharing one snapshot store
//! 4. Feed every accepted snapshot to the rate computer
//! 5. Cancel everything on shutdown

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod session;

pub use bootstrap::{BootstrapError, discover_pairs};
pub use config::{ConfigError, CrossrateConfigFile, load_config, load_default_config};
pub use session::{StreamingSession, rate_callback};
