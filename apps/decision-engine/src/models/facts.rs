//! Observed market facts for a single candidate setup.
//!
//! `TradeFacts` is a pure observation snapshot: it carries what was seen,
//! never what should be done about it. Price targets, sizing, and risk
//! numbers belong to [`super::TradeIntent`] and the computed
//! recommendation, not here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Qualitative label for whether observed conditions support acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupStatus {
    /// Conditions fully support the setup.
    Ready,
    /// Setup is developing but incomplete.
    Forming,
    /// Conditions do not currently support acting.
    NotReady,
}

/// Observed trend direction tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendTag {
    /// Higher highs and higher lows.
    Uptrend,
    /// Lower highs and lower lows.
    Downtrend,
    /// No directional structure.
    Sideways,
}

/// Observed momentum signal tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumTag {
    /// Momentum confirms upside.
    Bullish,
    /// Momentum confirms downside.
    Bearish,
    /// Momentum diverges from price.
    Divergence,
    /// No meaningful momentum reading.
    Flat,
}

/// Immutable snapshot of observed state for one instrument/timeframe.
///
/// Produced by the upstream screening subsystem. Indicator values are
/// carried as computed; the decision core never recomputes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFacts {
    /// Ticker symbol.
    pub symbol: String,
    /// Instrument ID (ticker or derivative symbol).
    pub instrument_id: String,
    /// Timeframe the setup was detected on (e.g. "1D", "4H").
    pub timeframe: String,
    /// Indicator name → value map (e.g. `"atr_pct"` → 3.2).
    pub indicators: HashMap<String, Decimal>,
    /// Trend tags observed at detection time.
    pub trend_tags: Vec<TrendTag>,
    /// Momentum tags observed at detection time.
    pub momentum_tags: Vec<MomentumTag>,
    /// Screener score assigned upstream (0-100).
    pub screener_score: Decimal,
    /// Setup status at detection time.
    pub setup_status: SetupStatus,
    /// When the setup was detected.
    pub detected_at: DateTime<Utc>,
}

impl TradeFacts {
    /// Look up a named indicator value, if the screener supplied it.
    #[must_use]
    pub fn indicator(&self, name: &str) -> Option<Decimal> {
        self.indicators.get(name).copied()
    }

    /// Returns true if any of the given trend tags is present.
    #[must_use]
    pub fn has_trend(&self, tag: TrendTag) -> bool {
        self.trend_tags.contains(&tag)
    }

    /// Returns true if any of the given momentum tags is present.
    #[must_use]
    pub fn has_momentum(&self, tag: MomentumTag) -> bool {
        self.momentum_tags.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_facts() -> TradeFacts {
        let mut indicators = HashMap::new();
        indicators.insert("atr_pct".to_string(), dec!(3.2));
        TradeFacts {
            symbol: "AAPL".to_string(),
            instrument_id: "AAPL".to_string(),
            timeframe: "1D".to_string(),
            indicators,
            trend_tags: vec![TrendTag::Uptrend],
            momentum_tags: vec![MomentumTag::Bullish],
            screener_score: dec!(82),
            setup_status: SetupStatus::Ready,
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn indicator_lookup() {
        let facts = make_facts();
        assert_eq!(facts.indicator("atr_pct"), Some(dec!(3.2)));
        assert_eq!(facts.indicator("rsi"), None);
    }

    #[test]
    fn tag_queries() {
        let facts = make_facts();
        assert!(facts.has_trend(TrendTag::Uptrend));
        assert!(!facts.has_trend(TrendTag::Downtrend));
        assert!(facts.has_momentum(MomentumTag::Bullish));
        assert!(!facts.has_momentum(MomentumTag::Divergence));
    }

    #[test]
    fn serde_round_trip_uses_screaming_snake_case() {
        let json = serde_json::to_string(&SetupStatus::NotReady).unwrap();
        assert_eq!(json, "\"NOT_READY\"");
    }
}
