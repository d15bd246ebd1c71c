//! Decision result types.
//!
//! A [`DecisionResult`] is the only artifact the executor may trust. It
//! is immutable once produced and records the ordered outcomes of every
//! check that ran, ending at the first failure when the engine
//! short-circuits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::advisory::AdvisoryReview;

/// The four deterministic checks, in their fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    /// Structural and numeric sanity.
    Validator,
    /// Per-trade and daily risk ceilings.
    RiskRules,
    /// Setup staleness re-validation.
    SetupQuality,
    /// Portfolio-level constraints.
    PortfolioConstraints,
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validator => "validator",
            Self::RiskRules => "risk_rules",
            Self::SetupQuality => "setup_quality",
            Self::PortfolioConstraints => "portfolio_constraints",
        };
        write!(f, "{name}")
    }
}

/// Outcome status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// The check ran and passed.
    Passed,
    /// The check ran and failed; the decision is a rejection.
    Failed,
    /// The check's input collaborator was unavailable; passed by default.
    Skipped,
}

/// One entry in the decision path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Which check produced this outcome.
    pub check: CheckKind,
    /// Pass/fail/skip status.
    pub status: CheckStatus,
    /// Machine-readable rejection code (e.g. `"risk_reward_below_minimum"`).
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Observed value that drove the outcome, when applicable.
    pub observed: Option<String>,
    /// Configured limit the value was compared against, when applicable.
    pub limit: Option<String>,
}

impl CheckOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn passed(check: CheckKind) -> Self {
        Self {
            check,
            status: CheckStatus::Passed,
            code: None,
            message: format!("{check} passed"),
            observed: None,
            limit: None,
        }
    }

    /// A skipped outcome, passing by default with an explanation.
    #[must_use]
    pub fn skipped(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            status: CheckStatus::Skipped,
            code: None,
            message: message.into(),
            observed: None,
            limit: None,
        }
    }

    /// A failing outcome carrying the rule and the offending values.
    #[must_use]
    pub fn failed(
        check: CheckKind,
        code: impl Into<String>,
        message: impl Into<String>,
        observed: impl Into<String>,
        limit: impl Into<String>,
    ) -> Self {
        Self {
            check,
            status: CheckStatus::Failed,
            code: Some(code.into()),
            message: message.into(),
            observed: Some(observed.into()),
            limit: Some(limit.into()),
        }
    }

    /// Returns true unless the check failed (skips pass by default).
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status != CheckStatus::Failed
    }
}

/// Immutable result of one Decision Engine evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Recommendation this result was evaluated for.
    pub recommendation_id: String,
    /// Recommendation revision that was evaluated.
    pub revision: u32,
    /// Whether every check passed.
    pub approved: bool,
    /// Summary reason: the first failure code, or `"all_checks_passed"`.
    pub reason: String,
    /// Ordered outcomes of every check that ran.
    pub decision_path: Vec<CheckOutcome>,
    /// Advisory review, attached only after full approval.
    pub advisory_review: Option<AdvisoryReview>,
    /// Confidence after applying the sanitized advisory adjustment.
    /// Annotation only; never feeds back into `approved`.
    pub adjusted_confidence: Option<Decimal>,
    /// When the evaluation happened.
    pub evaluated_at: DateTime<Utc>,
}

impl DecisionResult {
    /// An approval with the full decision path.
    #[must_use]
    pub fn approval(
        recommendation_id: impl Into<String>,
        revision: u32,
        decision_path: Vec<CheckOutcome>,
    ) -> Self {
        Self {
            recommendation_id: recommendation_id.into(),
            revision,
            approved: true,
            reason: "all_checks_passed".to_string(),
            decision_path,
            advisory_review: None,
            adjusted_confidence: None,
            evaluated_at: Utc::now(),
        }
    }

    /// A rejection, with the path ending at the first failing check.
    #[must_use]
    pub fn rejection(
        recommendation_id: impl Into<String>,
        revision: u32,
        reason: impl Into<String>,
        decision_path: Vec<CheckOutcome>,
    ) -> Self {
        Self {
            recommendation_id: recommendation_id.into(),
            revision,
            approved: false,
            reason: reason.into(),
            decision_path,
            advisory_review: None,
            adjusted_confidence: None,
            evaluated_at: Utc::now(),
        }
    }

    /// The first failing outcome, if this is a rejection.
    #[must_use]
    pub fn first_failure(&self) -> Option<&CheckOutcome> {
        self.decision_path
            .iter()
            .find(|o| o.status == CheckStatus::Failed)
    }

    /// Whether this result is well-formed enough for the executor to act
    /// on. A hand-built or partial result (empty path, path not starting
    /// at the Validator, blank recommendation id) is rejected outright.
    /// An approval must additionally carry the complete ordered
    /// four-check path: the engine only approves after every check ran.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        const FULL_PATH: [CheckKind; 4] = [
            CheckKind::Validator,
            CheckKind::RiskRules,
            CheckKind::SetupQuality,
            CheckKind::PortfolioConstraints,
        ];

        if self.recommendation_id.is_empty()
            || self.decision_path.is_empty()
            || self.decision_path[0].check != CheckKind::Validator
        {
            return false;
        }
        if self.approved {
            return self.decision_path.len() == FULL_PATH.len()
                && self
                    .decision_path
                    .iter()
                    .zip(FULL_PATH)
                    .all(|(outcome, kind)| outcome.check == kind);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_path() -> Vec<CheckOutcome> {
        vec![
            CheckOutcome::passed(CheckKind::Validator),
            CheckOutcome::passed(CheckKind::RiskRules),
            CheckOutcome::passed(CheckKind::SetupQuality),
            CheckOutcome::passed(CheckKind::PortfolioConstraints),
        ]
    }

    #[test]
    fn approval_shape() {
        let result = DecisionResult::approval("rec-1", 0, full_path());
        assert!(result.approved);
        assert_eq!(result.reason, "all_checks_passed");
        assert!(result.first_failure().is_none());
        assert!(result.is_well_formed());
    }

    #[test]
    fn rejection_reports_first_failure() {
        let result = DecisionResult::rejection(
            "rec-1",
            0,
            "risk_reward_below_minimum",
            vec![CheckOutcome::failed(
                CheckKind::Validator,
                "risk_reward_below_minimum",
                "reward:risk 1.5:1 is below the 2.0:1 minimum",
                "1.5",
                ">= 2.0",
            )],
        );
        assert!(!result.approved);
        let failure = result.first_failure().unwrap();
        assert_eq!(failure.check, CheckKind::Validator);
        assert_eq!(failure.code.as_deref(), Some("risk_reward_below_minimum"));
    }

    #[test]
    fn hand_built_result_is_malformed() {
        let empty_path = DecisionResult::approval("rec-1", 0, vec![]);
        assert!(!empty_path.is_well_formed());

        let wrong_start = DecisionResult::approval(
            "rec-1",
            0,
            vec![CheckOutcome::passed(CheckKind::RiskRules)],
        );
        assert!(!wrong_start.is_well_formed());

        let blank_id = DecisionResult::approval("", 0, full_path());
        assert!(!blank_id.is_well_formed());
    }

    #[test]
    fn approval_with_partial_path_is_malformed() {
        // An approval can only come from the engine having run every
        // check; a truncated path means the result was hand-built.
        let partial = DecisionResult::approval(
            "rec-1",
            0,
            vec![CheckOutcome::passed(CheckKind::Validator)],
        );
        assert!(!partial.is_well_formed());

        let reordered = DecisionResult::approval("rec-1", 0, {
            let mut path = full_path();
            path.swap(1, 2);
            path
        });
        assert!(!reordered.is_well_formed());

        // A rejection legitimately ends at its first failure.
        let rejection = DecisionResult::rejection(
            "rec-1",
            0,
            "daily_risk_exceeded",
            vec![
                CheckOutcome::passed(CheckKind::Validator),
                CheckOutcome::failed(
                    CheckKind::RiskRules,
                    "daily_risk_exceeded",
                    "over the ceiling",
                    "2.30%",
                    "<= 2.0%",
                ),
            ],
        );
        assert!(rejection.is_well_formed());
    }

    #[test]
    fn skipped_counts_as_pass() {
        let outcome = CheckOutcome::skipped(
            CheckKind::PortfolioConstraints,
            "portfolio state unavailable, check skipped",
        );
        assert!(outcome.is_pass());
    }
}
