//! Link configuration parameters
//!
//! Runtime-tunable timing for the command queue. Buffer and queue
//! capacities are compile-time `const` generics on
//! [`AtHandler`](crate::handler::AtHandler); their defaults live here too.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default capture buffer size in bytes, including the terminator slot.
pub const DEFAULT_CAPTURE_CAPACITY: usize = 32;
/// Default number of queued commands.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;
/// Default number of registered response patterns.
pub const DEFAULT_PATTERN_CAPACITY: usize = 8;
/// Default per-command response timeout (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u32 = 300;
/// Default number of timeouts tolerated before the queue is abandoned.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Command queue timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Timeout applied by `enqueue_command` when none is given (milliseconds)
    pub default_timeout_ms: u32,
    /// Timeouts on the in-flight command before the whole queue is cleared
    pub max_retries: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LinkConfig {
    /// Reject values that would make the retry machinery degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(Error::Config("max_retries must be at least 1"));
        }
        if self.default_timeout_ms == 0 {
            return Err(Error::Config("default_timeout_ms must be non-zero"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
