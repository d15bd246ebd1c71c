//! Execution boundary.
//!
//! The executor is the only component allowed to turn an approved
//! recommendation into a broker submission, and it re-verifies
//! everything instead of trusting its caller. Four gates run in order:
//! decision integrity, kill-switch, operating mode, and lifecycle
//! state. The lifecycle gate holds the per-recommendation lock across
//! the submission request and the QUEUED transition, so two concurrent
//! calls for the same recommendation cannot both submit.
//!
//! Every call is audited, whether it submits, withholds, or rejects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::{AuditEvent, AuditLog};
use crate::config::ExecutionConfig;
use crate::lifecycle::{LifecycleStore, TradeState, TransitionRecord};
use crate::models::{Bias, DecisionResult, SystemContext, TradeRecommendation};

/// Operating mode of the execution boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    /// Decisions are produced for humans; nothing is ever submitted.
    Advisory,
    /// Submission requires explicit operator confirmation per trade.
    SemiAutomated,
    /// Approved trades submit without operator involvement.
    FullyAutomated,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Advisory => "ADVISORY",
            Self::SemiAutomated => "SEMI_AUTOMATED",
            Self::FullyAutomated => "FULLY_AUTOMATED",
        };
        write!(f, "{name}")
    }
}

/// Per-call execution controls.
///
/// Snapshotted from operator state at call time so a mid-call flip of
/// the kill-switch cannot produce a half-evaluated gate sequence.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionControls {
    /// When engaged, nothing executes regardless of approval.
    pub kill_switch_engaged: bool,
    /// Operating mode for this call.
    pub mode: ExecutionMode,
    /// Operator confirmation, consumed by semi-automated submissions.
    pub operator_confirmed: bool,
}

impl Default for ExecutionControls {
    fn default() -> Self {
        Self {
            kill_switch_engaged: false,
            mode: ExecutionMode::Advisory,
            operator_confirmed: false,
        }
    }
}

impl ExecutionControls {
    /// Controls snapshotted from configuration, without confirmation.
    #[must_use]
    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self {
            kill_switch_engaged: config.kill_switch_engaged,
            mode: config.parsed_mode(),
            operator_confirmed: false,
        }
    }

    /// Same controls with operator confirmation attached.
    #[must_use]
    pub const fn confirmed(mut self) -> Self {
        self.operator_confirmed = true;
        self
    }
}

/// The four executor gates, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateKind {
    /// Decision result integrity and approval.
    Decision,
    /// Kill-switch.
    KillSwitch,
    /// Operating mode and operator confirmation.
    Mode,
    /// Lifecycle state check-and-transition.
    Lifecycle,
}

/// Outcome of a single gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateOutcome {
    /// Which gate produced this outcome.
    pub gate: GateKind,
    /// Whether the gate admitted the call.
    pub passed: bool,
    /// Why the gate blocked, or a note on how it passed.
    pub detail: String,
}

impl GateOutcome {
    fn passed(gate: GateKind, detail: impl Into<String>) -> Self {
        Self {
            gate,
            passed: true,
            detail: detail.into(),
        }
    }

    fn blocked(gate: GateKind, detail: impl Into<String>) -> Self {
        Self {
            gate,
            passed: false,
            detail: detail.into(),
        }
    }
}

/// How an execution call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionDisposition {
    /// The submission was admitted and the trade moved to QUEUED.
    Submitted,
    /// A safety gate blocked the call; retrying later may succeed.
    Withheld,
    /// The call can never succeed with these inputs.
    Rejected,
}

/// Result of one executor call. Produced for every call, including
/// blocked ones, and mirrored into the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Recommendation the call was for.
    pub recommendation_id: String,
    /// How the call ended.
    pub disposition: ExecutionDisposition,
    /// Machine-readable reason (e.g. `"kill_switch_active"`).
    pub reason: String,
    /// Gate-by-gate trail, ending at the first blocking gate.
    pub gates: Vec<GateOutcome>,
    /// Broker acknowledgement, present only when submitted.
    pub submission: Option<SubmissionAck>,
    /// Mode the call was actually evaluated under, after any advisory
    /// downgrade.
    pub effective_mode: ExecutionMode,
    /// When the call completed.
    pub completed_at: DateTime<Utc>,
}

impl ExecutionOutcome {
    /// Returns true if the submission went out.
    #[must_use]
    pub fn submitted(&self) -> bool {
        self.disposition == ExecutionDisposition::Submitted
    }
}

/// Order submission request handed to the port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Recommendation being executed.
    pub recommendation_id: String,
    /// Instrument symbol.
    pub symbol: String,
    /// Trade direction.
    pub side: Bias,
    /// Position size.
    pub quantity: Decimal,
    /// Intended entry price.
    pub entry_price: Decimal,
    /// Protective stop price.
    pub stop_price: Decimal,
}

impl ExecutionRequest {
    fn from_recommendation(rec: &TradeRecommendation) -> Self {
        Self {
            recommendation_id: rec.recommendation_id.clone(),
            symbol: rec.facts.symbol.clone(),
            side: rec.intent.bias,
            quantity: rec.quantity,
            entry_price: rec.entry_price,
            stop_price: rec.stop_price,
        }
    }
}

/// Broker acknowledgement of an admitted submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Broker-side order reference.
    pub order_ref: String,
    /// When the broker accepted the request.
    pub accepted_at: DateTime<Utc>,
}

/// Failures the execution port can report.
#[derive(Debug, Error)]
pub enum PortError {
    /// The venue refused the order.
    #[error("submission rejected by venue: {0}")]
    Rejected(String),

    /// The venue could not be reached.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Outbound order submission port.
#[async_trait]
pub trait ExecutionPort: Send + Sync {
    /// Submit an order request to the venue.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the venue refuses or cannot be
    /// reached; the caller leaves lifecycle state unchanged.
    async fn request_submission(&self, request: &ExecutionRequest) -> Result<SubmissionAck, PortError>;

    /// Port name for logs.
    fn port_name(&self) -> &str;
}

/// The execution boundary.
pub struct Executor {
    lifecycle: Arc<LifecycleStore>,
    audit: Arc<AuditLog>,
    port: Arc<dyn ExecutionPort>,
}

impl Executor {
    /// Create an executor over a lifecycle store, audit log and port.
    #[must_use]
    pub fn new(lifecycle: Arc<LifecycleStore>, audit: Arc<AuditLog>, port: Arc<dyn ExecutionPort>) -> Self {
        Self {
            lifecycle,
            audit,
            port,
        }
    }

    /// Run the four gates and, if all pass, submit the order and move
    /// the trade to QUEUED. The lifecycle lock is held across the
    /// submission so concurrent calls for the same recommendation
    /// serialize, and at most one observes APPROVED.
    ///
    /// Never panics and never returns early without auditing: blocked
    /// calls come back as `Withheld` or `Rejected` outcomes.
    pub async fn execute(
        &self,
        recommendation: &TradeRecommendation,
        result: &DecisionResult,
        context: Option<&SystemContext>,
        controls: &ExecutionControls,
    ) -> ExecutionOutcome {
        let mut gates = Vec::with_capacity(4);
        let effective_mode = self.effective_mode(result, controls);

        if let Some(blocked) = Self::decision_gate(recommendation, result, &mut gates) {
            return self.finish(recommendation, context, gates, None, effective_mode, blocked);
        }

        if controls.kill_switch_engaged {
            gates.push(GateOutcome::blocked(
                GateKind::KillSwitch,
                "kill-switch engaged",
            ));
            let blocked = (ExecutionDisposition::Withheld, "kill_switch_active");
            return self.finish(recommendation, context, gates, None, effective_mode, blocked);
        }
        gates.push(GateOutcome::passed(GateKind::KillSwitch, "disengaged"));

        if let Some(blocked) = Self::mode_gate(controls, effective_mode, &mut gates) {
            return self.finish(recommendation, context, gates, None, effective_mode, blocked);
        }

        // Lifecycle gate: lock, re-check state, submit, transition.
        let entry = match self.lifecycle.entry(&recommendation.recommendation_id).await {
            Ok(entry) => entry,
            Err(err) => {
                gates.push(GateOutcome::blocked(GateKind::Lifecycle, err.to_string()));
                let blocked = (ExecutionDisposition::Rejected, "unknown_recommendation");
                return self.finish(recommendation, context, gates, None, effective_mode, blocked);
            }
        };
        let mut guard = entry.lock().await;

        if guard.state != TradeState::Approved {
            gates.push(GateOutcome::blocked(
                GateKind::Lifecycle,
                format!("state is {}, expected APPROVED", guard.state),
            ));
            let blocked = (ExecutionDisposition::Rejected, "not_in_approved_state");
            return self.finish(recommendation, context, gates, None, effective_mode, blocked);
        }

        let request = ExecutionRequest::from_recommendation(recommendation);
        let ack = match self.port.request_submission(&request).await {
            Ok(ack) => ack,
            Err(err) => {
                // State stays APPROVED so the call can be retried.
                tracing::warn!(
                    recommendation_id = %recommendation.recommendation_id,
                    port = self.port.port_name(),
                    error = %err,
                    "submission failed, trade remains approved"
                );
                gates.push(GateOutcome::blocked(
                    GateKind::Lifecycle,
                    format!("submission failed: {err}"),
                ));
                let blocked = (ExecutionDisposition::Withheld, "submission_failed");
                return self.finish(recommendation, context, gates, None, effective_mode, blocked);
            }
        };

        let transition = match guard.transition(TradeState::Queued, "submission admitted") {
            Ok(record) => record,
            Err(err) => {
                // Unreachable while the lock is held, but never panic at
                // this boundary.
                gates.push(GateOutcome::blocked(GateKind::Lifecycle, err.to_string()));
                let blocked = (ExecutionDisposition::Rejected, "not_in_approved_state");
                return self.finish(recommendation, context, gates, None, effective_mode, blocked);
            }
        };
        drop(guard);

        gates.push(GateOutcome::passed(
            GateKind::Lifecycle,
            "APPROVED -> QUEUED",
        ));
        tracing::info!(
            recommendation_id = %recommendation.recommendation_id,
            order_ref = %ack.order_ref,
            mode = %effective_mode,
            "submission admitted"
        );
        self.record_outcome(
            recommendation,
            context,
            gates,
            Some(transition),
            effective_mode,
            ExecutionDisposition::Submitted,
            "submitted",
            Some(ack),
        )
    }

    /// Mode actually in force for this call: a BLOCK_FOR_AUTOMATION
    /// advisory downgrades fully-automated to semi-automated, for this
    /// call only.
    fn effective_mode(&self, result: &DecisionResult, controls: &ExecutionControls) -> ExecutionMode {
        let blocked = result
            .advisory_review
            .as_ref()
            .is_some_and(crate::advisory::AdvisoryReview::blocks_automation);
        if blocked && controls.mode == ExecutionMode::FullyAutomated {
            ExecutionMode::SemiAutomated
        } else {
            controls.mode
        }
    }

    fn decision_gate(
        recommendation: &TradeRecommendation,
        result: &DecisionResult,
        gates: &mut Vec<GateOutcome>,
    ) -> Option<(ExecutionDisposition, &'static str)> {
        if !result.is_well_formed() {
            gates.push(GateOutcome::blocked(
                GateKind::Decision,
                "decision result is malformed",
            ));
            return Some((ExecutionDisposition::Rejected, "malformed_decision_result"));
        }
        if result.recommendation_id != recommendation.recommendation_id
            || result.revision != recommendation.revision
        {
            gates.push(GateOutcome::blocked(
                GateKind::Decision,
                format!(
                    "result is for {}/r{}, not {}/r{}",
                    result.recommendation_id,
                    result.revision,
                    recommendation.recommendation_id,
                    recommendation.revision
                ),
            ));
            return Some((ExecutionDisposition::Rejected, "decision_result_mismatch"));
        }
        if !result.approved {
            gates.push(GateOutcome::blocked(
                GateKind::Decision,
                format!("decision was a rejection: {}", result.reason),
            ));
            return Some((ExecutionDisposition::Rejected, "decision_not_approved"));
        }
        gates.push(GateOutcome::passed(GateKind::Decision, "approved decision"));
        None
    }

    fn mode_gate(
        controls: &ExecutionControls,
        effective_mode: ExecutionMode,
        gates: &mut Vec<GateOutcome>,
    ) -> Option<(ExecutionDisposition, &'static str)> {
        match effective_mode {
            ExecutionMode::Advisory => {
                gates.push(GateOutcome::blocked(
                    GateKind::Mode,
                    "advisory mode never executes",
                ));
                Some((ExecutionDisposition::Withheld, "advisory_mode_no_execution"))
            }
            ExecutionMode::SemiAutomated if !controls.operator_confirmed => {
                let detail = if controls.mode == ExecutionMode::FullyAutomated {
                    "downgraded to semi-automated by advisory, operator confirmation required"
                } else {
                    "operator confirmation required"
                };
                gates.push(GateOutcome::blocked(GateKind::Mode, detail));
                Some((ExecutionDisposition::Withheld, "confirmation_required"))
            }
            ExecutionMode::SemiAutomated => {
                gates.push(GateOutcome::passed(
                    GateKind::Mode,
                    "operator confirmed semi-automated submission",
                ));
                None
            }
            ExecutionMode::FullyAutomated => {
                gates.push(GateOutcome::passed(GateKind::Mode, "fully automated"));
                None
            }
        }
    }

    fn finish(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
        gates: Vec<GateOutcome>,
        transition: Option<TransitionRecord>,
        effective_mode: ExecutionMode,
        (disposition, reason): (ExecutionDisposition, &'static str),
    ) -> ExecutionOutcome {
        tracing::warn!(
            recommendation_id = %recommendation.recommendation_id,
            %reason,
            ?disposition,
            "execution blocked"
        );
        self.record_outcome(
            recommendation,
            context,
            gates,
            transition,
            effective_mode,
            disposition,
            reason,
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn record_outcome(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
        gates: Vec<GateOutcome>,
        transition: Option<TransitionRecord>,
        effective_mode: ExecutionMode,
        disposition: ExecutionDisposition,
        reason: &str,
        submission: Option<SubmissionAck>,
    ) -> ExecutionOutcome {
        self.audit.record(
            &recommendation.recommendation_id,
            AuditEvent::Execution {
                gates: gates.clone(),
                transition,
                context: context.cloned(),
            },
        );
        ExecutionOutcome {
            recommendation_id: recommendation.recommendation_id.clone(),
            disposition,
            reason: reason.to_string(),
            gates,
            submission,
            effective_mode,
            completed_at: Utc::now(),
        }
    }
}
