//! Crate-level error type.
//!
//! Each module defines its own error enum close to the code that raises
//! it; this aggregate exists for callers that drive the whole pipeline
//! and want one `?`-able type.

use thiserror::Error;

use crate::advisory::AdvisoryError;
use crate::config::ConfigError;
use crate::executor::PortError;
use crate::lifecycle::LifecycleError;

/// Any error the decision core can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Lifecycle registration or transition failure.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Advisory boundary failure (normally recovered internally).
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),

    /// Execution port failure (normally recovered internally).
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Convenience alias for pipeline-level results.
pub type Result<T> = std::result::Result<T, Error>;
