//! The single source of truth for one proposed trade.
//!
//! A `TradeRecommendation` is built deterministically from exactly one
//! [`TradeFacts`] and one [`TradeIntent`]. It is immutable once
//! constructed: a state change produces a new revision with a bumped
//! revision counter, never an in-place mutation. One recommendation maps
//! to one lifecycle instance and many append-only audit entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::TradeState;

use super::{Bias, TargetLevel, TradeFacts, TradeIntent};

/// Deterministic, revisioned recommendation built from facts + intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecommendation {
    /// Stable recommendation ID (shared by all revisions).
    pub recommendation_id: String,
    /// Revision counter, starting at 0 and bumped on every state change.
    pub revision: u32,
    /// The observed facts this recommendation was built from.
    pub facts: TradeFacts,
    /// The proposed intent this recommendation was built from.
    pub intent: TradeIntent,
    /// Computed entry price.
    pub entry_price: Decimal,
    /// Computed protective stop price.
    pub stop_price: Decimal,
    /// Computed target levels, nearest first.
    pub targets: Vec<TargetLevel>,
    /// Reward:risk ratio recomputed from entry/stop/first target, signed
    /// per bias: non-positive when the first target cannot profit.
    pub risk_reward: Decimal,
    /// Risk per unit: |entry - stop|.
    pub risk_per_unit: Decimal,
    /// Total risk amount: risk per unit * resolved quantity.
    pub risk_amount: Decimal,
    /// Confidence score (0-100), derived from the screener score.
    pub confidence: Decimal,
    /// Resolved quantity (supplied by the sizing collaborator).
    pub quantity: Decimal,
    /// Conditions under which the setup is considered invalidated.
    pub invalidation_conditions: Vec<String>,
    /// Conditions that must hold at entry time.
    pub entry_conditions: Vec<String>,
    /// Reasoning trail accumulated while building the recommendation.
    pub reasoning: Vec<String>,
    /// Current lifecycle state.
    pub state: TradeState,
    /// When this revision was produced.
    pub created_at: DateTime<Utc>,
}

impl TradeRecommendation {
    /// Build a recommendation from one facts snapshot and one intent.
    ///
    /// The quantity is resolved upstream by the sizing collaborator; all
    /// derived risk numbers are computed here so two identical inputs
    /// always produce identical recommendations (modulo id/timestamp).
    #[must_use]
    pub fn build(facts: TradeFacts, intent: TradeIntent, quantity: Decimal) -> Self {
        let entry_price = intent.entry_price;
        let stop_price = intent.stop_price;
        let targets = intent.targets.clone();
        let risk_per_unit = (entry_price - stop_price).abs();
        let risk_amount = risk_per_unit * quantity;
        // Signed per bias: a target on the losing side of entry yields a
        // non-positive ratio instead of masquerading as a profit.
        let risk_reward = targets.first().map_or(Decimal::ZERO, |t| {
            if risk_per_unit == Decimal::ZERO {
                Decimal::ZERO
            } else {
                let reward = match intent.bias {
                    Bias::Short => entry_price - t.price,
                    Bias::Long | Bias::Avoid => t.price - entry_price,
                };
                reward / risk_per_unit
            }
        });

        let reasoning = vec![format!(
            "built from strategy {} on {} {} (screener score {})",
            intent.strategy_id, facts.symbol, facts.timeframe, facts.screener_score
        )];

        Self {
            recommendation_id: Uuid::new_v4().to_string(),
            revision: 0,
            confidence: facts.screener_score,
            entry_price,
            stop_price,
            targets,
            risk_reward,
            risk_per_unit,
            risk_amount,
            quantity,
            invalidation_conditions: vec![
                "stop price breached before entry".to_string(),
                "setup status regressed to NOT_READY".to_string(),
            ],
            entry_conditions: vec![format!("price trades at or through {entry_price}")],
            reasoning,
            state: TradeState::Proposed,
            created_at: Utc::now(),
            facts,
            intent,
        }
    }

    /// Produce the next revision with a new lifecycle state.
    ///
    /// The original revision is left untouched; callers keep or discard
    /// it as they see fit.
    #[must_use]
    pub fn with_state(&self, state: TradeState) -> Self {
        let mut next = self.clone();
        next.revision += 1;
        next.state = state;
        next.created_at = Utc::now();
        next
    }

    /// Produce the next revision with an extra line of reasoning.
    #[must_use]
    pub fn with_reasoning(&self, line: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.revision += 1;
        next.reasoning.push(line.into());
        next
    }

    /// Risk amount as a percentage of the given account equity.
    #[must_use]
    pub fn risk_pct_of(&self, account_equity: Decimal) -> Decimal {
        if account_equity == Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.risk_amount / account_equity) * Decimal::ONE_HUNDRED
    }
}
