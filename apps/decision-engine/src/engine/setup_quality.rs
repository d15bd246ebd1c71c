//! Setup staleness re-validation.
//!
//! Re-checks that the setup observed at detection time still supports
//! the proposed bias: the setup status has not regressed, trend tags
//! still agree with the direction, and momentum shows no opposing
//! signal. Only values already present in the facts are consulted;
//! indicators are never recomputed here.

use crate::models::{
    Bias, CheckKind, CheckOutcome, MomentumTag, SetupStatus, SystemContext, TradeRecommendation,
    TrendTag,
};

use super::TradeCheck;

/// Setup quality check.
#[derive(Debug, Clone, Default)]
pub struct SetupQuality;

impl SetupQuality {
    /// Create the check.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    const fn opposing_trend(bias: Bias) -> Option<TrendTag> {
        match bias {
            Bias::Long => Some(TrendTag::Downtrend),
            Bias::Short => Some(TrendTag::Uptrend),
            Bias::Avoid => None,
        }
    }

    const fn opposing_momentum(bias: Bias) -> Option<MomentumTag> {
        match bias {
            Bias::Long => Some(MomentumTag::Bearish),
            Bias::Short => Some(MomentumTag::Bullish),
            Bias::Avoid => None,
        }
    }
}

impl TradeCheck for SetupQuality {
    fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        _context: Option<&SystemContext>,
    ) -> CheckOutcome {
        let facts = &recommendation.facts;
        let bias = recommendation.intent.bias;

        if facts.setup_status == SetupStatus::NotReady {
            return CheckOutcome::failed(
                CheckKind::SetupQuality,
                "setup_not_ready",
                "setup status is NOT_READY",
                "NOT_READY",
                "READY or FORMING",
            );
        }

        if let Some(opposing) = Self::opposing_trend(bias)
            && facts.has_trend(opposing)
        {
            return CheckOutcome::failed(
                CheckKind::SetupQuality,
                "trend_conflicts_bias",
                format!("trend tag {opposing:?} conflicts with a {bias:?} bias"),
                format!("{opposing:?}"),
                format!("no {opposing:?} tag for {bias:?}"),
            );
        }

        if let Some(opposing) = Self::opposing_momentum(bias)
            && facts.has_momentum(opposing)
        {
            return CheckOutcome::failed(
                CheckKind::SetupQuality,
                "momentum_opposes_bias",
                format!("momentum tag {opposing:?} opposes a {bias:?} bias"),
                format!("{opposing:?}"),
                format!("no {opposing:?} tag for {bias:?}"),
            );
        }

        CheckOutcome::passed(CheckKind::SetupQuality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn fresh_setup_passes() {
        let rec = test_support::recommendation();
        assert!(SetupQuality::new().evaluate(&rec, None).is_pass());
    }

    #[test]
    fn not_ready_setup_fails() {
        let mut rec = test_support::recommendation();
        rec.facts.setup_status = SetupStatus::NotReady;
        let outcome = SetupQuality::new().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("setup_not_ready"));
    }

    #[test]
    fn forming_setup_still_passes() {
        let mut rec = test_support::recommendation();
        rec.facts.setup_status = SetupStatus::Forming;
        assert!(SetupQuality::new().evaluate(&rec, None).is_pass());
    }

    #[test]
    fn downtrend_conflicts_with_long() {
        let mut rec = test_support::recommendation();
        rec.facts.trend_tags.push(TrendTag::Downtrend);
        let outcome = SetupQuality::new().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("trend_conflicts_bias"));
    }

    #[test]
    fn uptrend_conflicts_with_short() {
        let mut rec = test_support::short_recommendation();
        rec.facts.trend_tags = vec![TrendTag::Uptrend];
        let outcome = SetupQuality::new().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("trend_conflicts_bias"));
    }

    #[test]
    fn bearish_momentum_opposes_long() {
        let mut rec = test_support::recommendation();
        rec.facts.momentum_tags = vec![MomentumTag::Bearish];
        let outcome = SetupQuality::new().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("momentum_opposes_bias"));
    }

    #[test]
    fn sideways_trend_does_not_conflict() {
        let mut rec = test_support::recommendation();
        rec.facts.trend_tags = vec![TrendTag::Sideways];
        assert!(SetupQuality::new().evaluate(&rec, None).is_pass());
    }
}
