//! Proposed directional action for a setup.
//!
//! `TradeIntent` says what the strategy wants to do and where, but never
//! how much: it carries a qualitative sizing hint rather than a quantity,
//! and no order type. Quantities are resolved on the recommendation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Proposed trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    /// Buy-side exposure.
    Long,
    /// Sell-side exposure.
    Short,
    /// Explicitly do not trade this setup.
    Avoid,
}

impl Bias {
    /// Returns true for directions that can actually be traded.
    #[must_use]
    pub const fn is_tradeable(&self) -> bool {
        matches!(self, Self::Long | Self::Short)
    }
}

/// Qualitative sizing hint. Not a quantity; sizing is resolved later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingHint {
    /// Smaller than standard exposure.
    Light,
    /// Standard exposure for the strategy.
    Standard,
    /// Larger than standard exposure.
    Aggressive,
}

/// A target price with its estimated hit probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLevel {
    /// Target price.
    pub price: Decimal,
    /// Estimated probability of reaching the target (0.0 to 1.0).
    pub probability: Decimal,
}

/// Proposed directional action built from one [`super::TradeFacts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Proposed direction.
    pub bias: Bias,
    /// Proposed entry price.
    pub entry_price: Decimal,
    /// Proposed protective stop price.
    pub stop_price: Decimal,
    /// Ordered target levels, nearest first.
    pub targets: Vec<TargetLevel>,
    /// Strategy's own reward:risk estimate. Advisory input only; the
    /// Validator recomputes the ratio from entry/stop/targets.
    pub expected_risk_reward: Decimal,
    /// Qualitative sizing hint.
    pub sizing_hint: SizingHint,
    /// Identifier of the strategy that produced this intent.
    pub strategy_id: String,
}

impl TradeIntent {
    /// The nearest (first) target, if any were proposed.
    #[must_use]
    pub fn first_target(&self) -> Option<&TargetLevel> {
        self.targets.first()
    }
}
