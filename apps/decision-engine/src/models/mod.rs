//! Data contracts shared across the decision core.
//!
//! Everything here is an immutable input or output: observed facts,
//! proposed intents, the recommendation built from them, the externally
//! supplied risk context, and the decision result the executor consumes.

mod context;
mod decision;
mod facts;
mod intent;
mod recommendation;

pub use context::{MarketRegime, PortfolioSnapshot, SessionPhase, SystemContext};
pub use decision::{CheckKind, CheckOutcome, CheckStatus, DecisionResult};
pub use facts::{MomentumTag, SetupStatus, TradeFacts, TrendTag};
pub use intent::{Bias, SizingHint, TargetLevel, TradeIntent};
pub use recommendation::TradeRecommendation;
