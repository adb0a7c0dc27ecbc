//! Chat polling settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_poll_interval_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// How often an open conversation refetches.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ChatConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polls_every_five_seconds_by_default() {
        assert_eq!(ChatConfig::default().poll_interval(), Duration::from_secs(5));
    }
}
