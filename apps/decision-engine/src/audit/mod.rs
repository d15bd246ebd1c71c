//! Append-only audit log.
//!
//! Every decision, executor attempt, and lifecycle transition is
//! recorded here, keyed by recommendation id with a per-id sequence
//! number. Entries are never mutated after write; the only operations
//! are append and read. Durable persistence is owned by an external
//! store that tails this log.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::executor::GateOutcome;
use crate::lifecycle::TransitionRecord;
use crate::models::{DecisionResult, SystemContext, TradeFacts, TradeIntent};

/// What an audit entry records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEvent {
    /// A Decision Engine evaluation.
    Decision {
        /// Facts the recommendation was built from.
        facts: TradeFacts,
        /// Intent the recommendation was built from.
        intent: TradeIntent,
        /// Full decision result, including path and advisory review.
        result: DecisionResult,
        /// Context snapshot used, when the collaborator was available.
        context: Option<SystemContext>,
    },
    /// An executor attempt, successful or not.
    Execution {
        /// Gate-by-gate outcome trail.
        gates: Vec<GateOutcome>,
        /// Resulting lifecycle transition, if one occurred.
        transition: Option<TransitionRecord>,
        /// Context snapshot used, when available.
        context: Option<SystemContext>,
    },
    /// A lifecycle transition outside the executor (cancel, fill, exit).
    Transition {
        /// The recorded transition.
        record: TransitionRecord,
    },
}

/// One immutable audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Recommendation this entry belongs to.
    pub recommendation_id: String,
    /// Per-recommendation sequence number, starting at 1.
    pub sequence: u64,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
    /// What happened.
    pub event: AuditEvent,
}

/// In-memory append-only audit log.
#[derive(Default)]
pub struct AuditLog {
    entries: RwLock<HashMap<String, Vec<AuditEntry>>>,
}

impl AuditLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event for a recommendation, returning the stored entry.
    pub fn record(&self, recommendation_id: &str, event: AuditEvent) -> AuditEntry {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let log = entries.entry(recommendation_id.to_string()).or_default();
        let entry = AuditEntry {
            recommendation_id: recommendation_id.to_string(),
            sequence: log.len() as u64 + 1,
            recorded_at: Utc::now(),
            event,
        };
        log.push(entry.clone());
        entry
    }

    /// All entries for a recommendation, in sequence order.
    #[must_use]
    pub fn entries_for(&self, recommendation_id: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recommendation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of entries across all recommendations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns true if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::TradeState;
    use crate::test_support;

    fn transition_event() -> AuditEvent {
        AuditEvent::Transition {
            record: TransitionRecord {
                from: TradeState::Proposed,
                to: TradeState::Approved,
                cause: "decision approved".to_string(),
                occurred_at: Utc::now(),
            },
        }
    }

    #[test]
    fn sequences_are_per_recommendation_and_monotonic() {
        let log = AuditLog::new();
        let first = log.record("rec-1", transition_event());
        let second = log.record("rec-1", transition_event());
        let other = log.record("rec-2", transition_event());

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(other.sequence, 1);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn entries_for_returns_in_order() {
        let log = AuditLog::new();
        log.record("rec-1", transition_event());
        log.record("rec-1", transition_event());

        let entries = log.entries_for("rec-1");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].sequence < entries[1].sequence);
        assert!(log.entries_for("missing").is_empty());
    }

    #[test]
    fn decision_event_snapshots_inputs() {
        let log = AuditLog::new();
        let rec = test_support::recommendation();
        let result = crate::models::DecisionResult::approval(
            rec.recommendation_id.clone(),
            rec.revision,
            vec![crate::models::CheckOutcome::passed(
                crate::models::CheckKind::Validator,
            )],
        );
        let entry = log.record(
            &rec.recommendation_id,
            AuditEvent::Decision {
                facts: rec.facts.clone(),
                intent: rec.intent.clone(),
                result,
                context: Some(test_support::context()),
            },
        );

        match entry.event {
            AuditEvent::Decision { facts, context, .. } => {
                assert_eq!(facts.symbol, rec.facts.symbol);
                assert!(context.is_some());
            }
            _ => panic!("expected decision event"),
        }
    }
}
