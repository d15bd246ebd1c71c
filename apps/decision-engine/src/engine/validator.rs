//! Structural and numeric sanity check.
//!
//! First check in the pipeline and always mandatory. Malformed input
//! fails fast here with a specific reason; nothing is silently
//! defaulted. The reward:risk ratio is recomputed from the
//! recommendation's own entry/stop/first target rather than trusting the
//! intent's estimate.

use rust_decimal::Decimal;

use crate::models::{Bias, CheckKind, CheckOutcome, SystemContext, TradeRecommendation};

use super::TradeCheck;

/// Structural validator.
#[derive(Debug, Clone)]
pub struct Validator {
    min_risk_reward: Decimal,
    min_confidence: Decimal,
}

impl Validator {
    /// Create a validator with the given minimums.
    #[must_use]
    pub const fn new(min_risk_reward: Decimal, min_confidence: Decimal) -> Self {
        Self {
            min_risk_reward,
            min_confidence,
        }
    }

    fn check_structure(&self, rec: &TradeRecommendation) -> Option<CheckOutcome> {
        let kind = CheckKind::Validator;

        if rec.facts.symbol.is_empty() || rec.facts.instrument_id.is_empty() {
            return Some(CheckOutcome::failed(
                kind,
                "missing_required_field",
                "facts are missing symbol or instrument id",
                "empty",
                "non-empty symbol and instrument id",
            ));
        }
        if rec.intent.strategy_id.is_empty() {
            return Some(CheckOutcome::failed(
                kind,
                "missing_required_field",
                "intent is missing the strategy identifier",
                "empty",
                "non-empty strategy id",
            ));
        }
        if rec.intent.bias == Bias::Avoid {
            return Some(CheckOutcome::failed(
                kind,
                "bias_not_tradeable",
                "intent explicitly flags this setup as avoid",
                "AVOID",
                "LONG or SHORT",
            ));
        }
        if rec.entry_price <= Decimal::ZERO || rec.stop_price <= Decimal::ZERO {
            return Some(CheckOutcome::failed(
                kind,
                "invalid_price",
                "entry and stop prices must be positive",
                format!("entry={}, stop={}", rec.entry_price, rec.stop_price),
                "> 0",
            ));
        }

        let stop_ok = match rec.intent.bias {
            Bias::Long => rec.stop_price < rec.entry_price,
            Bias::Short => rec.stop_price > rec.entry_price,
            Bias::Avoid => false,
        };
        if !stop_ok {
            return Some(CheckOutcome::failed(
                kind,
                "stop_on_wrong_side",
                format!(
                    "stop {} is on the wrong side of entry {} for a {:?} bias",
                    rec.stop_price, rec.entry_price, rec.intent.bias
                ),
                format!("stop={}", rec.stop_price),
                match rec.intent.bias {
                    Bias::Long => format!("< entry ({})", rec.entry_price),
                    _ => format!("> entry ({})", rec.entry_price),
                },
            ));
        }

        if rec.targets.is_empty() {
            return Some(CheckOutcome::failed(
                kind,
                "no_targets",
                "at least one target level is required",
                "0 targets",
                ">= 1 target",
            ));
        }

        None
    }
}

impl TradeCheck for Validator {
    fn evaluate(
        &self,
        recommendation: &TradeRecommendation,
        _context: Option<&SystemContext>,
    ) -> CheckOutcome {
        if let Some(failure) = self.check_structure(recommendation) {
            return failure;
        }

        if recommendation.risk_reward <= Decimal::ZERO {
            return CheckOutcome::failed(
                CheckKind::Validator,
                "target_on_wrong_side",
                format!(
                    "first target {} cannot profit against entry {} for a {:?} bias",
                    recommendation
                        .targets
                        .first()
                        .map_or_else(String::new, |t| t.price.to_string()),
                    recommendation.entry_price,
                    recommendation.intent.bias
                ),
                format!("{}:1", recommendation.risk_reward.round_dp(2)),
                "> 0:1",
            );
        }

        if recommendation.risk_reward < self.min_risk_reward {
            return CheckOutcome::failed(
                CheckKind::Validator,
                "risk_reward_below_minimum",
                format!(
                    "reward:risk {}:1 is below the configured minimum {}:1",
                    recommendation.risk_reward.round_dp(2),
                    self.min_risk_reward
                ),
                format!("{}:1", recommendation.risk_reward.round_dp(2)),
                format!(">= {}:1", self.min_risk_reward),
            );
        }

        if recommendation.confidence < self.min_confidence {
            return CheckOutcome::failed(
                CheckKind::Validator,
                "confidence_below_minimum",
                format!(
                    "confidence {} is below the configured minimum {}",
                    recommendation.confidence, self.min_confidence
                ),
                recommendation.confidence.to_string(),
                format!(">= {}", self.min_confidence),
            );
        }

        CheckOutcome::passed(CheckKind::Validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetLevel;
    use crate::test_support;
    use rust_decimal_macros::dec;

    fn validator() -> Validator {
        Validator::new(dec!(2.0), dec!(60))
    }

    #[test]
    fn well_formed_recommendation_passes() {
        let rec = test_support::recommendation();
        let outcome = validator().evaluate(&rec, None);
        assert!(outcome.is_pass(), "{outcome:?}");
    }

    #[test]
    fn boundary_risk_reward_ratio() {
        // entry=100, stop=95 (long), target=110 -> ratio (110-100)/(100-95) = 2.0
        let rec = test_support::recommendation();
        assert_eq!(rec.risk_reward, dec!(2));

        // Passes at min 2.0.
        assert!(validator().evaluate(&rec, None).is_pass());

        // Fails at min 2.1 with the specific reason.
        let strict = Validator::new(dec!(2.1), dec!(60));
        let outcome = strict.evaluate(&rec, None);
        assert!(!outcome.is_pass());
        assert_eq!(outcome.code.as_deref(), Some("risk_reward_below_minimum"));
    }

    #[test]
    fn long_target_below_entry_cannot_profit() {
        // entry=100, stop=95, only target=90: ratio is -2.0, not 2.0.
        let mut rec = test_support::recommendation();
        rec.intent.targets = vec![TargetLevel {
            price: dec!(90),
            probability: dec!(0.5),
        }];
        let rec = crate::models::TradeRecommendation::build(
            rec.facts,
            rec.intent,
            dec!(100),
        );
        assert_eq!(rec.risk_reward, dec!(-2));

        let outcome = validator().evaluate(&rec, None);
        assert!(!outcome.is_pass());
        assert_eq!(outcome.code.as_deref(), Some("target_on_wrong_side"));
    }

    #[test]
    fn avoid_bias_is_rejected() {
        let mut rec = test_support::recommendation();
        rec.intent.bias = Bias::Avoid;
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("bias_not_tradeable"));
    }

    #[test]
    fn stop_above_entry_fails_for_long() {
        let mut rec = test_support::recommendation();
        rec.stop_price = dec!(105);
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("stop_on_wrong_side"));
    }

    #[test]
    fn stop_below_entry_passes_for_short() {
        let mut rec = test_support::short_recommendation();
        let outcome = validator().evaluate(&rec, None);
        assert!(outcome.is_pass(), "{outcome:?}");

        rec.stop_price = dec!(90);
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("stop_on_wrong_side"));
    }

    #[test]
    fn missing_targets_fails() {
        let mut rec = test_support::recommendation();
        rec.targets = vec![];
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("no_targets"));
    }

    #[test]
    fn low_confidence_fails() {
        let mut rec = test_support::recommendation();
        rec.confidence = dec!(45);
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("confidence_below_minimum"));
        assert_eq!(outcome.observed.as_deref(), Some("45"));
    }

    #[test]
    fn empty_symbol_fails_fast() {
        let mut rec = test_support::recommendation();
        rec.facts.symbol = String::new();
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("missing_required_field"));
    }

    #[test]
    fn zero_entry_price_fails() {
        let mut rec = test_support::recommendation();
        rec.entry_price = Decimal::ZERO;
        rec.targets = vec![TargetLevel {
            price: dec!(10),
            probability: dec!(0.5),
        }];
        let outcome = validator().evaluate(&rec, None);
        assert_eq!(outcome.code.as_deref(), Some("invalid_price"));
    }
}
