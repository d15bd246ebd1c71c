//! Advisory review boundary.
//!
//! An optional side-channel opinion from the scoring subsystem, attached
//! only after the deterministic checks have all passed. The boundary is
//! hard: the reviewer's output is restricted to an advisory level, a
//! clamped confidence adjustment, and notes. Any attempt to return an
//! approve/reject verdict is discarded and replaced with the safe
//! default. On failure or timeout the deterministic result is returned
//! unchanged: the pipeline behaves identically with this step disabled.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DecisionResult, TradeRecommendation};

/// Advisory severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryLevel {
    /// Informational note, no operational effect.
    Info,
    /// Elevated caution, no operational effect.
    Warning,
    /// Forces the executor's mode gate to require manual confirmation
    /// for this one recommendation. Does not revoke approval.
    BlockForAutomation,
}

/// Verdict a misbehaving reviewer might try to smuggle through.
///
/// The contract forbids it; its presence in an opinion causes the whole
/// opinion to be replaced with the safe default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryVerdict {
    /// Attempted approval override.
    Approve,
    /// Attempted rejection override.
    Reject,
}

/// Raw opinion as returned by the scoring subsystem, before sanitizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryOpinion {
    /// Advisory level.
    pub level: AdvisoryLevel,
    /// Proposed confidence adjustment, clamped during sanitizing.
    pub confidence_adjustment: Decimal,
    /// Free-text notes.
    pub notes: String,
    /// Forbidden verdict field. Must be `None` per the contract.
    pub verdict: Option<AdvisoryVerdict>,
}

/// Sanitized advisory review as attached to a decision result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReview {
    /// Advisory level.
    pub level: AdvisoryLevel,
    /// Confidence adjustment, guaranteed within the configured bound.
    pub confidence_adjustment: Decimal,
    /// Free-text notes.
    pub notes: String,
}

impl AdvisoryReview {
    /// The safe default: info level, zero adjustment.
    #[must_use]
    pub fn safe_default() -> Self {
        Self {
            level: AdvisoryLevel::Info,
            confidence_adjustment: Decimal::ZERO,
            notes: String::new(),
        }
    }

    /// Returns true if this review forces manual confirmation.
    #[must_use]
    pub const fn blocks_automation(&self) -> bool {
        matches!(self.level, AdvisoryLevel::BlockForAutomation)
    }
}

/// Advisory boundary errors. All are recovered locally by falling back
/// to the unchanged deterministic result.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The reviewer returned an error.
    #[error("advisory review failed: {0}")]
    ReviewFailed(String),

    /// The reviewer did not answer within the configured timeout.
    #[error("advisory review timed out after {0:?}")]
    Timeout(Duration),
}

/// Reviewer supplied by the scoring subsystem.
#[async_trait]
pub trait AdvisoryReviewer: Send + Sync {
    /// Produce an opinion for an approved recommendation.
    async fn review(
        &self,
        recommendation: &TradeRecommendation,
        result: &DecisionResult,
    ) -> Result<AdvisoryOpinion, AdvisoryError>;

    /// Reviewer name, for logging.
    fn reviewer_name(&self) -> &'static str;
}

/// Enforce the advisory contract on a raw opinion.
///
/// A present verdict voids the whole opinion; the adjustment is clamped
/// to `[-max_adjustment, +max_adjustment]`.
#[must_use]
pub fn sanitize_opinion(opinion: AdvisoryOpinion, max_adjustment: Decimal) -> AdvisoryReview {
    if let Some(verdict) = opinion.verdict {
        tracing::warn!(
            ?verdict,
            "advisory reviewer attempted an approve/reject verdict, discarding opinion"
        );
        return AdvisoryReview::safe_default();
    }

    let clamped = opinion
        .confidence_adjustment
        .clamp(-max_adjustment, max_adjustment);
    if clamped != opinion.confidence_adjustment {
        tracing::warn!(
            proposed = %opinion.confidence_adjustment,
            clamped = %clamped,
            "advisory confidence adjustment out of range, clamping"
        );
    }

    AdvisoryReview {
        level: opinion.level,
        confidence_adjustment: clamped,
        notes: opinion.notes,
    }
}

/// Attach an advisory review to an approved decision result.
///
/// Runs the reviewer with a bounded timeout. The review is never
/// attempted for rejections, and neither a reviewer failure nor a
/// timeout alters the deterministic result in any way.
pub async fn attach_review(
    reviewer: &dyn AdvisoryReviewer,
    recommendation: &TradeRecommendation,
    result: DecisionResult,
    timeout: Duration,
    max_adjustment: Decimal,
) -> DecisionResult {
    if !result.approved {
        return result;
    }

    let call = reviewer.review(recommendation, &result);
    let opinion = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(opinion)) => opinion,
        Ok(Err(e)) => {
            tracing::warn!(
                recommendation_id = %result.recommendation_id,
                reviewer = reviewer.reviewer_name(),
                error = %e,
                "advisory review failed, proceeding without it"
            );
            return result;
        }
        Err(_) => {
            tracing::warn!(
                recommendation_id = %result.recommendation_id,
                reviewer = reviewer.reviewer_name(),
                timeout_ms = timeout.as_millis() as u64,
                "advisory review timed out, proceeding without it"
            );
            return result;
        }
    };

    let review = sanitize_opinion(opinion, max_adjustment);
    let adjusted = (recommendation.confidence + review.confidence_adjustment)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    tracing::info!(
        recommendation_id = %result.recommendation_id,
        level = ?review.level,
        adjustment = %review.confidence_adjustment,
        "advisory review attached"
    );

    let mut enriched = result;
    enriched.advisory_review = Some(review);
    enriched.adjusted_confidence = Some(adjusted);
    enriched
}
