//! Point-in-time risk state supplied by the portfolio/ledger subsystem.
//!
//! `SystemContext` is read-only from the decision core's perspective and
//! is never persisted here. The supplying collaborator returns one
//! coherent snapshot per evaluation; absence of the collaborator degrades
//! the checks that depend on it rather than blocking the pipeline.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broad market regime tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    /// Directional market with persistent moves.
    Trending,
    /// Range-bound market.
    Ranging,
    /// Elevated volatility.
    Volatile,
    /// Compressed, low-volatility market.
    Quiet,
}

/// Phase of the trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// Before the regular session opens.
    PreMarket,
    /// Opening phase of the regular session.
    Open,
    /// Middle of the regular session.
    Midday,
    /// Closing phase of the regular session.
    Close,
    /// After the regular session.
    AfterHours,
}

/// Portfolio snapshot for the portfolio constraints check.
///
/// Supplied separately from the core risk figures because the portfolio
/// collaborator may be absent, in which case the dependent check passes
/// by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Open position count per symbol.
    pub open_positions_by_symbol: HashMap<String, u32>,
    /// Capital currently available for new positions.
    pub available_capital: Decimal,
}

/// Read-only aggregate of point-in-time risk state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContext {
    /// Current market regime tag.
    pub market_regime: MarketRegime,
    /// Total account equity.
    pub account_equity: Decimal,
    /// Today's realized P&L.
    pub daily_pnl: Decimal,
    /// Risk already committed today, as a percentage of equity.
    pub daily_risk_used_pct: Decimal,
    /// Decline from the most recent equity peak, as a percentage.
    pub drawdown_pct: Decimal,
    /// Trades taken today.
    pub trades_today: u32,
    /// Consecutive losing trades.
    pub consecutive_losses: u32,
    /// Current session phase.
    pub session_phase: SessionPhase,
    /// Portfolio snapshot, when the portfolio collaborator is available.
    pub portfolio: Option<PortfolioSnapshot>,
}

impl SystemContext {
    /// Open positions currently held for the given symbol, when known.
    #[must_use]
    pub fn open_positions_for(&self, symbol: &str) -> Option<u32> {
        self.portfolio
            .as_ref()
            .map(|p| p.open_positions_by_symbol.get(symbol).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn open_positions_lookup() {
        let mut positions = HashMap::new();
        positions.insert("AAPL".to_string(), 1);
        let ctx = SystemContext {
            market_regime: MarketRegime::Trending,
            account_equity: dec!(100_000),
            daily_pnl: dec!(-250),
            daily_risk_used_pct: dec!(0.5),
            drawdown_pct: dec!(1.2),
            trades_today: 2,
            consecutive_losses: 1,
            session_phase: SessionPhase::Midday,
            portfolio: Some(PortfolioSnapshot {
                open_positions_by_symbol: positions,
                available_capital: dec!(40_000),
            }),
        };
        assert_eq!(ctx.open_positions_for("AAPL"), Some(1));
        assert_eq!(ctx.open_positions_for("MSFT"), Some(0));
    }

    #[test]
    fn open_positions_unknown_without_portfolio() {
        let ctx = SystemContext {
            market_regime: MarketRegime::Quiet,
            account_equity: dec!(50_000),
            daily_pnl: Decimal::ZERO,
            daily_risk_used_pct: Decimal::ZERO,
            drawdown_pct: Decimal::ZERO,
            trades_today: 0,
            consecutive_losses: 0,
            session_phase: SessionPhase::PreMarket,
            portfolio: None,
        };
        assert_eq!(ctx.open_positions_for("AAPL"), None);
    }
}
