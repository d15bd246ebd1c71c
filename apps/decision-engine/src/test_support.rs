//! Shared fixtures for unit and integration tests.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal_macros::dec;

use crate::models::{
    Bias, MarketRegime, MomentumTag, PortfolioSnapshot, SessionPhase, SetupStatus, SizingHint,
    SystemContext, TargetLevel, TradeFacts, TradeIntent, TradeRecommendation, TrendTag,
};

/// A long AAPL setup that passes every default check.
///
/// entry 100, stop 95, first target 110: reward:risk exactly 2.0:1 at
/// the default minimum, confidence 75, quantity 100 (0.5% risk on the
/// default fixture equity).
pub fn recommendation() -> TradeRecommendation {
    let mut indicators = HashMap::new();
    indicators.insert("atr_pct".to_string(), dec!(3.2));

    let facts = TradeFacts {
        symbol: "AAPL".to_string(),
        instrument_id: "AAPL".to_string(),
        timeframe: "1D".to_string(),
        indicators,
        trend_tags: vec![TrendTag::Uptrend],
        momentum_tags: vec![MomentumTag::Bullish],
        screener_score: dec!(75),
        setup_status: SetupStatus::Ready,
        detected_at: Utc::now(),
    };
    let intent = TradeIntent {
        bias: Bias::Long,
        entry_price: dec!(100),
        stop_price: dec!(95),
        targets: vec![TargetLevel {
            price: dec!(110),
            probability: dec!(0.5),
        }],
        expected_risk_reward: dec!(2.0),
        sizing_hint: SizingHint::Standard,
        strategy_id: "breakout-v2".to_string(),
    };
    TradeRecommendation::build(facts, intent, dec!(100))
}

/// Short-side counterpart to [`recommendation`], also passing defaults.
pub fn short_recommendation() -> TradeRecommendation {
    let mut rec = recommendation();
    rec.intent.bias = Bias::Short;
    rec.intent.stop_price = dec!(105);
    rec.intent.targets = vec![TargetLevel {
        price: dec!(89),
        probability: dec!(0.5),
    }];
    rec.facts.trend_tags = vec![TrendTag::Downtrend];
    rec.facts.momentum_tags = vec![MomentumTag::Bearish];
    TradeRecommendation::build(rec.facts, rec.intent, dec!(100))
}

/// A healthy mid-session context with ample headroom.
pub fn context() -> SystemContext {
    SystemContext {
        market_regime: MarketRegime::Trending,
        account_equity: dec!(100_000),
        daily_pnl: dec!(150),
        daily_risk_used_pct: dec!(0.5),
        drawdown_pct: dec!(1.0),
        trades_today: 1,
        consecutive_losses: 0,
        session_phase: SessionPhase::Midday,
        portfolio: Some(PortfolioSnapshot {
            open_positions_by_symbol: HashMap::new(),
            available_capital: dec!(40_000),
        }),
    }
}
