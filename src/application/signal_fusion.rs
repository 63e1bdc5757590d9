//! Signal fusion: reduces the trend call and the latest indicator readings
//! to one recommendation with a confidence score.
//!
//! Scoring: the trend call is worth 2 points to its direction, RSI oversold
//! 1 bullish / overbought 1 bearish, MACD histogram 1 point to its side. A
//! side must win by more than 1 point to produce a directional call; the
//! margin keeps near-ties at HOLD.

use crate::application::ml::trend_classifier::TrendCall;
use crate::config::FusionConfig;
use crate::domain::market::signal::{MacdZone, Recommendation, RsiZone, TrendDirection};

pub fn rsi_zone(value: f64, config: &FusionConfig) -> RsiZone {
    if value < config.rsi_oversold {
        RsiZone::Oversold
    } else if value > config.rsi_overbought {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    }
}

pub fn macd_zone(histogram: f64) -> MacdZone {
    if histogram > 0.0 {
        MacdZone::Bullish
    } else {
        MacdZone::Bearish
    }
}

/// Point tally to decision. Confidence is the winning side's share of all
/// points, exactly 0.5 on HOLD.
pub fn decide(bullish: u32, bearish: u32) -> (Recommendation, f64) {
    let total = (bullish + bearish) as f64;
    if bullish > bearish + 1 {
        (Recommendation::Buy, bullish as f64 / total)
    } else if bearish > bullish + 1 {
        (Recommendation::Sell, bearish as f64 / total)
    } else {
        (Recommendation::Hold, 0.5)
    }
}

/// Fuses the ensemble trend call with the discretized indicator readings.
///
/// Without a trend call (untrained classifier) fusion degrades to the
/// trend-neutral default; indicator points alone never produce a
/// directional call.
pub fn fuse(trend: Option<&TrendCall>, rsi: RsiZone, macd: MacdZone) -> (Recommendation, f64) {
    let Some(trend) = trend else {
        return (Recommendation::Hold, 0.5);
    };

    let mut bullish = 0u32;
    let mut bearish = 0u32;

    match trend.direction {
        TrendDirection::Bullish => bullish += 2,
        TrendDirection::Bearish => bearish += 2,
        TrendDirection::Neutral => {}
    }

    match rsi {
        RsiZone::Oversold => bullish += 1,
        RsiZone::Overbought => bearish += 1,
        RsiZone::Neutral => {}
    }

    match macd {
        MacdZone::Bullish => bullish += 1,
        MacdZone::Bearish => bearish += 1,
    }

    decide(bullish, bearish)
}
