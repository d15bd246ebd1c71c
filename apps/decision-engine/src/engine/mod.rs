//! Decision Engine orchestrator.
//!
//! A pure function of (recommendation, context) → decision result: no
//! durable writes, no network calls, no randomness. The four checks run
//! in fixed order and the engine short-circuits on the first failure, so
//! the decision path always contains every check that ran and nothing
//! more. Checks are independent units behind one common trait; new
//! checks append to the list without touching the orchestrator.

mod portfolio;
mod risk_rules;
mod setup_quality;
mod validator;

use rust_decimal::Decimal;

use crate::advisory::{AdvisoryReviewer, attach_review};
use crate::config::{AdvisoryConfig, ChecksConfig, Config};
use crate::models::{CheckOutcome, DecisionResult, SystemContext, TradeRecommendation};

pub use portfolio::PortfolioConstraints;
pub use risk_rules::RiskRules;
pub use setup_quality::SetupQuality;
pub use validator::Validator;

/// Typed check thresholds, converted from config-file floats once at
/// engine construction.
#[derive(Debug, Clone)]
pub struct CheckLimits {
    /// Minimum reward:risk ratio.
    pub min_risk_reward: Decimal,
    /// Minimum confidence score (0-100).
    pub min_confidence: Decimal,
    /// Daily risk ceiling as a percentage of equity.
    pub max_daily_risk_pct: Decimal,
    /// Instrument volatility cap (ATR % of price).
    pub max_volatility_pct: Decimal,
    /// Maximum concurrent positions per symbol.
    pub max_positions_per_symbol: u32,
}

impl Default for CheckLimits {
    fn default() -> Self {
        Self::from_checks_config(&ChecksConfig::default())
    }
}

impl CheckLimits {
    /// Convert the config-file representation to engine decimals.
    #[must_use]
    pub fn from_checks_config(config: &ChecksConfig) -> Self {
        Self {
            min_risk_reward: Decimal::try_from(config.min_risk_reward)
                .unwrap_or_else(|_| Decimal::new(2, 0)),
            min_confidence: Decimal::try_from(config.min_confidence)
                .unwrap_or_else(|_| Decimal::new(60, 0)),
            max_daily_risk_pct: Decimal::try_from(config.max_daily_risk_pct)
                .unwrap_or_else(|_| Decimal::new(2, 0)),
            max_volatility_pct: Decimal::try_from(config.max_volatility_pct)
                .unwrap_or_else(|_| Decimal::new(8, 0)),
            max_positions_per_symbol: config.max_positions_per_symbol,
        }
    }
}

/// One deterministic check: a pure unit evaluating a recommendation
/// against the point-in-time context. Each check owns its degraded
/// behavior when a collaborator is absent: Validator and RiskRules
/// always produce a real verdict, the others skip (pass) and say so in
/// the outcome.
pub trait TradeCheck: Send + Sync {
    /// Evaluate the recommendation. Must not perform I/O.
    fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
    ) -> CheckOutcome;
}

/// Runs the checks in fixed order with first-failure short-circuit.
pub struct DecisionEngine {
    checks: Vec<Box<dyn TradeCheck>>,
}

impl DecisionEngine {
    /// Create an engine with the standard four checks.
    #[must_use]
    pub fn new(limits: CheckLimits) -> Self {
        Self {
            checks: vec![
                Box::new(Validator::new(
                    limits.min_risk_reward,
                    limits.min_confidence,
                )),
                Box::new(RiskRules::new(
                    limits.max_daily_risk_pct,
                    limits.max_volatility_pct,
                )),
                Box::new(SetupQuality::new()),
                Box::new(PortfolioConstraints::new(limits.max_positions_per_symbol)),
            ],
        }
    }

    /// Create an engine from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(CheckLimits::from_checks_config(&config.checks))
    }

    /// Create an engine with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(CheckLimits::default())
    }

    /// Evaluate a recommendation against the checks.
    ///
    /// Deterministic: identical (recommendation, context) inputs yield
    /// an identical decision apart from the evaluation timestamp. The
    /// returned path ends at the first failing check; later checks never
    /// ran.
    #[must_use]
    pub fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
    ) -> DecisionResult {
        let mut path: Vec<CheckOutcome> = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let outcome = check.evaluate(recommendation, context);
            let failed = !outcome.is_pass();
            path.push(outcome);

            if failed {
                // Safe: just pushed.
                let last = &path[path.len() - 1];
                let reason = last.code.clone().unwrap_or_else(|| "check_failed".to_string());
                tracing::warn!(
                    recommendation_id = %recommendation.recommendation_id,
                    check = %last.check,
                    code = %reason,
                    observed = last.observed.as_deref().unwrap_or(""),
                    limit = last.limit.as_deref().unwrap_or(""),
                    "recommendation rejected"
                );
                return DecisionResult::rejection(
                    recommendation.recommendation_id.clone(),
                    recommendation.revision,
                    reason,
                    path,
                );
            }
        }

        tracing::info!(
            recommendation_id = %recommendation.recommendation_id,
            symbol = %recommendation.facts.symbol,
            checks = path.len(),
            "recommendation approved"
        );
        DecisionResult::approval(
            recommendation.recommendation_id.clone(),
            recommendation.revision,
            path,
        )
    }

    /// Evaluate, then attach the advisory review to approvals.
    ///
    /// The review runs only after all checks pass and can never flip the
    /// outcome; with `reviewer` absent or the feature disabled this is
    /// exactly [`Self::evaluate`].
    pub async fn evaluate_with_review(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
        reviewer: Option<&dyn AdvisoryReviewer>,
        advisory: &AdvisoryConfig,
    ) -> DecisionResult {
        let result = self.evaluate(recommendation, context);
        match reviewer {
            Some(reviewer) if advisory.enabled && result.approved => {
                attach_review(
                    reviewer,
                    recommendation,
                    result,
                    std::time::Duration::from_millis(advisory.timeout_ms),
                    Decimal::from(advisory.max_confidence_adjustment),
                )
                .await
            }
            _ => result,
        }
    }
}
