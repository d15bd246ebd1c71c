// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Decision Engine - Rust Core Library
//!
//! Deterministic decision core for a trade recommendation pipeline:
//! given observed facts and a proposed intent, produce an auditable
//! approve/reject decision and carry the approved trade through an
//! explicit lifecycle to a gated execution boundary.
//!
//! # Architecture
//!
//! - **Data contracts** (`models`): [`models::TradeFacts`],
//!   [`models::TradeIntent`], the immutable
//!   [`models::TradeRecommendation`] built from them, the externally
//!   supplied [`models::SystemContext`], and the
//!   [`models::DecisionResult`] the executor consumes.
//! - **Decision Engine** (`engine`): four deterministic checks in fixed
//!   order with first-failure short-circuit. Pure: no I/O, no
//!   randomness, no wall-clock dependence beyond the result timestamp.
//! - **Advisory boundary** (`advisory`): an optional, strictly bounded
//!   opinion attached only to approvals; it can annotate but never flip
//!   a decision.
//! - **Lifecycle** (`lifecycle`): one-directional state machine from
//!   PROPOSED to the terminal states, with per-recommendation locking.
//! - **Executor** (`executor`): four safety gates between an approved
//!   decision and an order submission; re-verifies everything.
//! - **Audit** (`audit`): append-only record of every decision,
//!   execution attempt, and transition.
//!
//! Determinism is the core property: identical inputs produce identical
//! decisions, and every rejection names the rule, the observed value,
//! and the configured limit that produced it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod advisory;
pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod models;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
