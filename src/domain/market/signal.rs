use serde::{Deserialize, Serialize};

/// Final discrete call for one signal request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// Discretized RSI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Overbought,
    Neutral,
}

/// Discretized MACD histogram reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdZone {
    Bullish,
    Bearish,
}

/// Raw indicator value together with its discrete zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorReading<Z> {
    pub value: f64,
    pub signal: Z,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub bearish: f64,
    pub bullish: f64,
}

/// Trend classification attached to a signal. When the classifier member is
/// untrained the direction is `Neutral` with confidence 0.5 and no
/// probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub confidence: f64,
    pub probabilities: Option<ClassProbabilities>,
}

impl TrendAnalysis {
    pub fn neutral() -> Self {
        Self {
            direction: TrendDirection::Neutral,
            confidence: 0.5,
            probabilities: None,
        }
    }
}

/// Per-model next-period price predictions. Absent members are excluded from
/// the ensemble mean; `ensemble` is `None` only when every member is absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PricePredictions {
    pub regressor: Option<f64>,
    pub forecaster: Option<f64>,
    pub ensemble: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSignals {
    pub rsi: IndicatorReading<RsiZone>,
    pub macd: IndicatorReading<MacdZone>,
}

/// The output record of one end-to-end signal request. Created fresh per
/// request and never mutated afterwards. The timestamp is the last bar's
/// timestamp, keeping repeated calls on the same series deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    pub timestamp: i64,
    pub last_price: f64,
    pub price_prediction: PricePredictions,
    pub trend: TrendAnalysis,
    pub technical: TechnicalSignals,
    pub recommendation: Recommendation,
    pub confidence: f64,
}
