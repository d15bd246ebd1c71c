//! Trade lifecycle state machine.
//!
//! Tracks a recommendation from proposal to exit. Transitions are
//! one-directional: no state is ever revisited, and the terminal states
//! (EXITED, CANCELLED, INVALIDATED) are absorbing. Cancellation and
//! invalidation are only reachable before a position is entered; after
//! ENTERED, exit proceeds only through MANAGING → EXITED.
//!
//! The [`LifecycleStore`] keeps one entry per recommendation behind a
//! per-recommendation async lock so the executor's check-and-transition
//! is atomic: two concurrent calls for the same id cannot both observe
//! APPROVED.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Lifecycle state of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeState {
    /// Initial state: recommendation exists but has not been decided.
    Proposed,
    /// Decision Engine approved the recommendation.
    Approved,
    /// Executor admitted the submission request.
    Queued,
    /// Fill confirmed; position is open.
    Entered,
    /// Position management has begun.
    Managing,
    /// Full exit confirmed. Terminal.
    Exited,
    /// Explicitly cancelled before entry. Terminal.
    Cancelled,
    /// Setup conditions invalidated before entry. Terminal.
    Invalidated,
}

impl TradeState {
    /// Returns true for absorbing states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Exited | Self::Cancelled | Self::Invalidated)
    }
}

impl std::fmt::Display for TradeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Proposed => "PROPOSED",
            Self::Approved => "APPROVED",
            Self::Queued => "QUEUED",
            Self::Entered => "ENTERED",
            Self::Managing => "MANAGING",
            Self::Exited => "EXITED",
            Self::Cancelled => "CANCELLED",
            Self::Invalidated => "INVALIDATED",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The attempted transition is not in the machine's table. The
    /// current state is left unchanged.
    #[error("invalid transition {from} -> {to}: {reason}")]
    InvalidTransition {
        /// State the recommendation was in.
        from: TradeState,
        /// State the caller asked for.
        to: TradeState,
        /// Human-readable reason.
        reason: String,
    },

    /// No lifecycle entry exists for the recommendation id.
    #[error("unknown recommendation: {0}")]
    UnknownRecommendation(String),

    /// A lifecycle entry already exists for the recommendation id.
    #[error("recommendation already registered: {0}")]
    AlreadyRegistered(String),
}

/// One recorded transition: timestamp plus cause, per the audit rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from: TradeState,
    /// State after the transition.
    pub to: TradeState,
    /// Why the transition happened (decision approval, fill, operator...).
    pub cause: String,
    /// When the transition happened.
    pub occurred_at: DateTime<Utc>,
}

/// Trade lifecycle state machine for validating transitions.
pub struct TradeStateMachine;

impl TradeStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: TradeState, to: TradeState) -> bool {
        matches!(
            (from, to),
            // Forward path
            (TradeState::Proposed, TradeState::Approved)
                | (TradeState::Approved, TradeState::Queued)
                | (TradeState::Queued, TradeState::Entered)
                | (TradeState::Entered, TradeState::Managing)
                | (TradeState::Managing, TradeState::Exited)
                // Cancellation / invalidation, only before ENTERED
                | (TradeState::Proposed, TradeState::Cancelled)
                | (TradeState::Approved, TradeState::Cancelled)
                | (TradeState::Queued, TradeState::Cancelled)
                | (TradeState::Proposed, TradeState::Invalidated)
                | (TradeState::Approved, TradeState::Invalidated)
                | (TradeState::Queued, TradeState::Invalidated)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] if the transition is
    /// not in the table; the caller's state is left unchanged.
    pub fn validate_transition(from: TradeState, to: TradeState) -> Result<(), LifecycleError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: TradeState, to: TradeState) -> String {
        match from {
            TradeState::Exited => format!("trade already exited, cannot transition to {to}"),
            TradeState::Cancelled => format!("trade is cancelled, cannot transition to {to}"),
            TradeState::Invalidated => {
                format!("trade was invalidated, cannot transition to {to}")
            }
            TradeState::Entered | TradeState::Managing
                if matches!(to, TradeState::Cancelled | TradeState::Invalidated) =>
            {
                format!("position already entered, {to} is only reachable before entry")
            }
            _ => format!("invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: TradeState) -> Vec<TradeState> {
        match from {
            TradeState::Proposed => vec![
                TradeState::Approved,
                TradeState::Cancelled,
                TradeState::Invalidated,
            ],
            TradeState::Approved => vec![
                TradeState::Queued,
                TradeState::Cancelled,
                TradeState::Invalidated,
            ],
            TradeState::Queued => vec![
                TradeState::Entered,
                TradeState::Cancelled,
                TradeState::Invalidated,
            ],
            TradeState::Entered => vec![TradeState::Managing],
            TradeState::Managing => vec![TradeState::Exited],
            // Terminal states
            TradeState::Exited | TradeState::Cancelled | TradeState::Invalidated => vec![],
        }
    }
}

/// Mutable lifecycle entry for one recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLifecycle {
    /// Recommendation this lifecycle tracks.
    pub recommendation_id: String,
    /// Current state.
    pub state: TradeState,
    /// Monotonic version, bumped on every transition.
    pub version: u32,
    /// Full transition history.
    pub history: Vec<TransitionRecord>,
}

impl TradeLifecycle {
    fn new(recommendation_id: String) -> Self {
        Self {
            recommendation_id,
            state: TradeState::Proposed,
            version: 0,
            history: Vec::new(),
        }
    }

    /// Apply a validated transition, recording timestamp and cause.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] and leaves the entry
    /// unchanged if the transition is illegal.
    pub fn transition(
        &mut self,
        to: TradeState,
        cause: impl Into<String>,
    ) -> Result<TransitionRecord, LifecycleError> {
        TradeStateMachine::validate_transition(self.state, to)?;
        let record = TransitionRecord {
            from: self.state,
            to,
            cause: cause.into(),
            occurred_at: Utc::now(),
        };
        self.state = to;
        self.version += 1;
        self.history.push(record.clone());
        tracing::info!(
            recommendation_id = %self.recommendation_id,
            from = %record.from,
            to = %record.to,
            cause = %record.cause,
            "lifecycle transition"
        );
        Ok(record)
    }
}

/// Store of per-recommendation lifecycle entries.
///
/// Each entry sits behind its own `Mutex` so check-and-transition
/// sequences (and the executor's submit-then-queue) are atomic per
/// recommendation without serializing unrelated recommendations.
#[derive(Default)]
pub struct LifecycleStore {
    entries: RwLock<HashMap<String, Arc<Mutex<TradeLifecycle>>>>,
}

impl LifecycleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recommendation in the PROPOSED state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyRegistered`] if the id is known.
    pub async fn register(&self, recommendation_id: &str) -> Result<(), LifecycleError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(recommendation_id) {
            return Err(LifecycleError::AlreadyRegistered(
                recommendation_id.to_string(),
            ));
        }
        entries.insert(
            recommendation_id.to_string(),
            Arc::new(Mutex::new(TradeLifecycle::new(
                recommendation_id.to_string(),
            ))),
        );
        Ok(())
    }

    /// Handle to the lifecycle entry for a recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::UnknownRecommendation`] if unregistered.
    pub async fn entry(
        &self,
        recommendation_id: &str,
    ) -> Result<Arc<Mutex<TradeLifecycle>>, LifecycleError> {
        let entries = self.entries.read().await;
        entries
            .get(recommendation_id)
            .cloned()
            .ok_or_else(|| LifecycleError::UnknownRecommendation(recommendation_id.to_string()))
    }

    /// Apply a transition under the per-recommendation lock.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or illegal transitions; state is
    /// left unchanged on failure.
    pub async fn transition(
        &self,
        recommendation_id: &str,
        to: TradeState,
        cause: impl Into<String>,
    ) -> Result<TransitionRecord, LifecycleError> {
        let entry = self.entry(recommendation_id).await?;
        let mut guard = entry.lock().await;
        guard.transition(to, cause)
    }

    /// Explicit operator cancellation. Legal only before ENTERED.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::transition`].
    pub async fn cancel(
        &self,
        recommendation_id: &str,
        cause: impl Into<String>,
    ) -> Result<TransitionRecord, LifecycleError> {
        self.transition(recommendation_id, TradeState::Cancelled, cause)
            .await
    }

    /// Setup invalidation. Legal only before ENTERED.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::transition`].
    pub async fn invalidate(
        &self,
        recommendation_id: &str,
        cause: impl Into<String>,
    ) -> Result<TransitionRecord, LifecycleError> {
        self.transition(recommendation_id, TradeState::Invalidated, cause)
            .await
    }

    /// Current state of a recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::UnknownRecommendation`] if unregistered.
    pub async fn current_state(&self, recommendation_id: &str) -> Result<TradeState, LifecycleError> {
        let entry = self.entry(recommendation_id).await?;
        let guard = entry.lock().await;
        Ok(guard.state)
    }

    /// Transition history of a recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::UnknownRecommendation`] if unregistered.
    pub async fn history(
        &self,
        recommendation_id: &str,
    ) -> Result<Vec<TransitionRecord>, LifecycleError> {
        let entry = self.entry(recommendation_id).await?;
        let guard = entry.lock().await;
        Ok(guard.history.clone())
    }
}
