//! Advisory review boundary configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the advisory review side-call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Whether the advisory call is attempted at all.
    #[serde(default = "default_advisory_enabled")]
    pub enabled: bool,
    /// Bounded timeout for the reviewer call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Absolute bound on the confidence adjustment (default: 10).
    #[serde(default = "default_max_confidence_adjustment")]
    pub max_confidence_adjustment: u32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_advisory_enabled(),
            timeout_ms: default_timeout_ms(),
            max_confidence_adjustment: default_max_confidence_adjustment(),
        }
    }
}

const fn default_advisory_enabled() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    3_000
}

const fn default_max_confidence_adjustment() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AdvisoryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.timeout_ms, 3_000);
        assert_eq!(config.max_confidence_adjustment, 10);
    }
}
