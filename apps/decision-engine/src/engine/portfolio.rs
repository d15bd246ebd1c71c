//! Portfolio-level constraints.
//!
//! Non-mandatory: when the portfolio collaborator is absent this check
//! passes by default rather than blocking the pipeline.

use crate::models::{CheckKind, CheckOutcome, SystemContext, TradeRecommendation};

use super::TradeCheck;

/// Portfolio constraints check.
#[derive(Debug, Clone)]
pub struct PortfolioConstraints {
    max_positions_per_symbol: u32,
}

impl PortfolioConstraints {
    /// Create the check with the per-symbol position cap.
    #[must_use]
    pub const fn new(max_positions_per_symbol: u32) -> Self {
        Self {
            max_positions_per_symbol,
        }
    }
}

impl TradeCheck for PortfolioConstraints {
    fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
    ) -> CheckOutcome {
        let Some(portfolio) = context.and_then(|ctx| ctx.portfolio.as_ref()) else {
            return CheckOutcome::skipped(
                CheckKind::PortfolioConstraints,
                "portfolio state unavailable, check passed by default",
            );
        };

        let symbol = &recommendation.facts.symbol;
        let open = portfolio
            .open_positions_by_symbol
            .get(symbol)
            .copied()
            .unwrap_or(0);
        if open >= self.max_positions_per_symbol {
            return CheckOutcome::failed(
                CheckKind::PortfolioConstraints,
                "max_positions_per_symbol",
                format!(
                    "{open} open position(s) in {symbol} already at the {} cap",
                    self.max_positions_per_symbol
                ),
                open.to_string(),
                format!("< {}", self.max_positions_per_symbol),
            );
        }

        let required_capital = recommendation.entry_price * recommendation.quantity;
        if required_capital > portfolio.available_capital {
            return CheckOutcome::failed(
                CheckKind::PortfolioConstraints,
                "insufficient_capital",
                format!(
                    "position requires {} but only {} is available",
                    required_capital.round_dp(2),
                    portfolio.available_capital.round_dp(2)
                ),
                format!("{}", required_capital.round_dp(2)),
                format!("<= {}", portfolio.available_capital.round_dp(2)),
            );
        }

        CheckOutcome::passed(CheckKind::PortfolioConstraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckStatus;
    use crate::test_support;
    use rust_decimal_macros::dec;

    fn check() -> PortfolioConstraints {
        PortfolioConstraints::new(1)
    }

    #[test]
    fn passes_within_limits() {
        let rec = test_support::recommendation();
        let ctx = test_support::context();
        assert!(check().evaluate(&rec, Some(&ctx)).is_pass());
    }

    #[test]
    fn skips_without_portfolio_snapshot() {
        let rec = test_support::recommendation();
        let mut ctx = test_support::context();
        ctx.portfolio = None;
        let outcome = check().evaluate(&rec, Some(&ctx));
        assert_eq!(outcome.status, CheckStatus::Skipped);
        assert!(outcome.is_pass());
    }

    #[test]
    fn skips_without_context() {
        let rec = test_support::recommendation();
        let outcome = check().evaluate(&rec, None);
        assert_eq!(outcome.status, CheckStatus::Skipped);
    }

    #[test]
    fn existing_position_hits_symbol_cap() {
        let rec = test_support::recommendation();
        let mut ctx = test_support::context();
        if let Some(portfolio) = ctx.portfolio.as_mut() {
            portfolio
                .open_positions_by_symbol
                .insert(rec.facts.symbol.clone(), 1);
        }
        let outcome = check().evaluate(&rec, Some(&ctx));
        assert_eq!(outcome.code.as_deref(), Some("max_positions_per_symbol"));
    }

    #[test]
    fn insufficient_capital_fails() {
        let rec = test_support::recommendation();
        let mut ctx = test_support::context();
        if let Some(portfolio) = ctx.portfolio.as_mut() {
            portfolio.available_capital = dec!(50);
        }
        let outcome = check().evaluate(&rec, Some(&ctx));
        assert_eq!(outcome.code.as_deref(), Some("insufficient_capital"));
    }
}
