//! Daily risk ceiling and volatility cap.
//!
//! Mandatory check. The daily clause combines this trade's risk with the
//! risk already committed today; the volatility clause caps the
//! instrument's ATR as a percentage of price. When the risk context
//! collaborator is absent the daily clause passes through with an
//! explicit note, while the volatility clause still runs from the facts
//! alone.

use rust_decimal::Decimal;

use crate::models::{CheckKind, CheckOutcome, SystemContext, TradeRecommendation};

use super::TradeCheck;

/// Indicator key carrying ATR as a percentage of price.
pub const ATR_PCT_INDICATOR: &str = "atr_pct";

/// Risk ceiling check.
#[derive(Debug, Clone)]
pub struct RiskRules {
    max_daily_risk_pct: Decimal,
    max_volatility_pct: Decimal,
}

impl RiskRules {
    /// Create the check with the given ceilings.
    #[must_use]
    pub const fn new(max_daily_risk_pct: Decimal, max_volatility_pct: Decimal) -> Self {
        Self {
            max_daily_risk_pct,
            max_volatility_pct,
        }
    }

    fn check_daily_ceiling(
        &self,
        rec: &TradeRecommendation,
        ctx: &SystemContext,
    ) -> Option<CheckOutcome> {
        let trade_risk_pct = rec.risk_pct_of(ctx.account_equity);
        let combined = ctx.daily_risk_used_pct + trade_risk_pct;

        if combined > self.max_daily_risk_pct {
            return Some(CheckOutcome::failed(
                CheckKind::RiskRules,
                "daily_risk_exceeded",
                format!(
                    "daily risk {}% used plus this trade's {}% would reach {}%, over the {:.1}% ceiling",
                    ctx.daily_risk_used_pct,
                    trade_risk_pct.round_dp(2),
                    combined.round_dp(2),
                    self.max_daily_risk_pct
                ),
                format!("{}%", combined.round_dp(2)),
                // Fixed precision: config-built limits lose the trailing
                // zero that decimal literals keep.
                format!("<= {:.1}%", self.max_daily_risk_pct),
            ));
        }
        None
    }

    fn check_volatility(&self, rec: &TradeRecommendation) -> Option<CheckOutcome> {
        let atr_pct = rec.facts.indicator(ATR_PCT_INDICATOR)?;
        if atr_pct > self.max_volatility_pct {
            return Some(CheckOutcome::failed(
                CheckKind::RiskRules,
                "volatility_above_cap",
                format!(
                    "ATR {}% of price exceeds the {:.1}% volatility cap",
                    atr_pct, self.max_volatility_pct
                ),
                format!("{atr_pct}%"),
                format!("<= {:.1}%", self.max_volatility_pct),
            ));
        }
        None
    }
}

impl TradeCheck for RiskRules {
    fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        context: Option<&SystemContext>,
    ) -> CheckOutcome {
        match context {
            Some(ctx) => {
                if let Some(failure) = self.check_daily_ceiling(recommendation, ctx) {
                    return failure;
                }
                if let Some(failure) = self.check_volatility(recommendation) {
                    return failure;
                }
                CheckOutcome::passed(CheckKind::RiskRules)
            }
            None => {
                // Collaborator failure, recovered locally: the daily
                // ceiling cannot be evaluated without the ledger, but the
                // volatility clause still runs from the facts.
                if let Some(failure) = self.check_volatility(recommendation) {
                    return failure;
                }
                tracing::warn!(
                    recommendation_id = %recommendation.recommendation_id,
                    "risk context unavailable, daily ceiling passed through"
                );
                CheckOutcome {
                    message: "risk context unavailable, daily ceiling passed through".to_string(),
                    ..CheckOutcome::passed(CheckKind::RiskRules)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rust_decimal_macros::dec;

    fn rules() -> RiskRules {
        RiskRules::new(dec!(2.0), dec!(8.0))
    }

    #[test]
    fn within_ceiling_passes() {
        let rec = test_support::recommendation();
        let ctx = test_support::context();
        assert!(rules().evaluate(&rec, Some(&ctx)).is_pass());
    }

    #[test]
    fn combined_daily_risk_over_ceiling() {
        // 1.5% already used + 0.8% new trade = 2.3% > 2.0% ceiling.
        let mut rec = test_support::recommendation();
        rec.quantity = dec!(160);
        rec.risk_amount = dec!(800); // 0.8% of 100k equity
        let mut ctx = test_support::context();
        ctx.daily_risk_used_pct = dec!(1.5);
        ctx.account_equity = dec!(100_000);

        let outcome = rules().evaluate(&rec, Some(&ctx));
        assert!(!outcome.is_pass());
        assert_eq!(outcome.code.as_deref(), Some("daily_risk_exceeded"));
        assert_eq!(outcome.observed.as_deref(), Some("2.30%"));
        assert_eq!(outcome.limit.as_deref(), Some("<= 2.0%"));
    }

    #[test]
    fn config_built_limits_format_like_literals() {
        // Limits converted from config floats display without a trailing
        // zero; the emitted limit string must not depend on that.
        let limits = crate::engine::CheckLimits::from_checks_config(
            &crate::config::ChecksConfig::default(),
        );
        let rules = RiskRules::new(limits.max_daily_risk_pct, limits.max_volatility_pct);

        let mut rec = test_support::recommendation();
        rec.quantity = dec!(160);
        rec.risk_amount = dec!(800);
        let mut ctx = test_support::context();
        ctx.daily_risk_used_pct = dec!(1.5);

        let outcome = rules.evaluate(&rec, Some(&ctx));
        assert_eq!(outcome.code.as_deref(), Some("daily_risk_exceeded"));
        assert_eq!(outcome.limit.as_deref(), Some("<= 2.0%"));
    }

    #[test]
    fn volatility_above_cap_fails() {
        let mut rec = test_support::recommendation();
        rec.facts
            .indicators
            .insert(ATR_PCT_INDICATOR.to_string(), dec!(9.5));
        let ctx = test_support::context();

        let outcome = rules().evaluate(&rec, Some(&ctx));
        assert_eq!(outcome.code.as_deref(), Some("volatility_above_cap"));
    }

    #[test]
    fn missing_atr_indicator_skips_volatility_clause() {
        let mut rec = test_support::recommendation();
        rec.facts.indicators.clear();
        let ctx = test_support::context();
        assert!(rules().evaluate(&rec, Some(&ctx)).is_pass());
    }

    #[test]
    fn missing_context_passes_through_daily_clause() {
        let rec = test_support::recommendation();
        let outcome = rules().evaluate(&rec, None);
        assert!(outcome.is_pass());
        assert!(outcome.message.contains("passed through"));
    }

    #[test]
    fn missing_context_still_enforces_volatility() {
        let mut rec = test_support::recommendation();
        rec.facts
            .indicators
            .insert(ATR_PCT_INDICATOR.to_string(), dec!(12));
        let outcome = rules().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("volatility_above_cap"));
    }
}
