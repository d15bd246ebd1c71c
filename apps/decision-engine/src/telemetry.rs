//! Tracing initialization.
//!
//! Console-only structured logging with an environment filter. The
//! decision core emits `tracing` events at every decision, advisory,
//! lifecycle, and execution boundary; this wires them to stdout.
//!
//! # Usage
//!
//! ```rust,ignore
//! decision_engine::telemetry::init_tracing();
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with an environment filter.
///
/// Respects `RUST_LOG` when set, defaulting to `info`. Safe to call at
/// most once per process; subsequent calls are ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so tests that each spin up the pipeline don't panic on
    // the second initialization.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
