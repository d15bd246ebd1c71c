//! Execution control configuration: kill-switch and operating mode.
//!
//! These are process-wide flags set by the operator interface, but they
//! are passed into each executor call as explicit values rather than
//! read as ambient globals, so tests (and operators) can set them per
//! call.

use serde::{Deserialize, Serialize};

use crate::executor::ExecutionMode;

/// Execution control configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Kill-switch: when engaged, nothing executes regardless of
    /// approval.
    #[serde(default)]
    pub kill_switch_engaged: bool,
    /// Operating mode: "ADVISORY", "SEMI_AUTOMATED" or
    /// "FULLY_AUTOMATED".
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            kill_switch_engaged: false,
            mode: default_mode(),
        }
    }
}

impl ExecutionConfig {
    /// Parse the configured mode string, falling back to the safest
    /// mode (advisory) on anything unrecognized.
    #[must_use]
    pub fn parsed_mode(&self) -> ExecutionMode {
        match self.mode.to_uppercase().as_str() {
            "FULLY_AUTOMATED" => ExecutionMode::FullyAutomated,
            "SEMI_AUTOMATED" => ExecutionMode::SemiAutomated,
            _ => ExecutionMode::Advisory,
        }
    }
}

fn default_mode() -> String {
    "ADVISORY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe() {
        let config = ExecutionConfig::default();
        assert!(!config.kill_switch_engaged);
        assert_eq!(config.parsed_mode(), ExecutionMode::Advisory);
    }

    #[test]
    fn mode_parsing() {
        let mut config = ExecutionConfig::default();

        config.mode = "FULLY_AUTOMATED".to_string();
        assert_eq!(config.parsed_mode(), ExecutionMode::FullyAutomated);

        config.mode = "semi_automated".to_string();
        assert_eq!(config.parsed_mode(), ExecutionMode::SemiAutomated);

        // Unknown falls back to the safest mode.
        config.mode = "yolo".to_string();
        assert_eq!(config.parsed_mode(), ExecutionMode::Advisory);
    }
}
