//! Threshold configuration for the deterministic checks.

use serde::{Deserialize, Serialize};

/// Threshold configuration for the four decision checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksConfig {
    /// Minimum reward:risk ratio (default: 2.0).
    #[serde(default = "default_min_risk_reward")]
    pub min_risk_reward: f64,
    /// Minimum confidence score, 0-100 (default: 60.0).
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Daily risk ceiling as a percentage of equity (default: 2.0).
    #[serde(default = "default_max_daily_risk_pct")]
    pub max_daily_risk_pct: f64,
    /// Instrument volatility cap, ATR as a percentage of price
    /// (default: 8.0).
    #[serde(default = "default_max_volatility_pct")]
    pub max_volatility_pct: f64,
    /// Maximum concurrent positions per symbol (default: 1).
    #[serde(default = "default_max_positions_per_symbol")]
    pub max_positions_per_symbol: u32,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            min_risk_reward: default_min_risk_reward(),
            min_confidence: default_min_confidence(),
            max_daily_risk_pct: default_max_daily_risk_pct(),
            max_volatility_pct: default_max_volatility_pct(),
            max_positions_per_symbol: default_max_positions_per_symbol(),
        }
    }
}

const fn default_min_risk_reward() -> f64 {
    2.0
}

const fn default_min_confidence() -> f64 {
    60.0
}

const fn default_max_daily_risk_pct() -> f64 {
    2.0
}

const fn default_max_volatility_pct() -> f64 {
    8.0
}

const fn default_max_positions_per_symbol() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = ChecksConfig::default();
        assert!((config.min_risk_reward - 2.0).abs() < f64::EPSILON);
        assert!((config.min_confidence - 60.0).abs() < f64::EPSILON);
        assert!((config.max_daily_risk_pct - 2.0).abs() < f64::EPSILON);
        assert!((config.max_volatility_pct - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.max_positions_per_symbol, 1);
    }
}
