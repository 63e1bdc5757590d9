//! Price-pattern snapshots derived from the indicator frame: where the last
//! close sits between rolling support/resistance, and the short/long moving
//! average trend.

use crate::domain::market::frame::IndicatorFrame;
use serde::{Deserialize, Serialize};

const FAST_WINDOW: usize = 10;
const SLOW_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
    pub current_price: f64,
    /// Where the current price sits between support (0) and resistance (1)
    pub position: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum TrendPattern {
    Upward { strength_pct: f64 },
    Downward { strength_pct: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePatterns {
    pub support_resistance: SupportResistance,
    pub trend: TrendPattern,
}

fn mean_of_tail(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Returns `None` when the frame is shorter than the slow trend window.
pub fn identify_patterns(frame: &IndicatorFrame) -> Option<PricePatterns> {
    if frame.len() < SLOW_WINDOW {
        return None;
    }

    let current_price = *frame.close.last()?;
    let support = *frame.support.last()?;
    let resistance = *frame.resistance.last()?;
    let position = if resistance > support {
        (current_price - support) / (resistance - support)
    } else {
        0.5
    };

    let sma_fast = mean_of_tail(&frame.close, FAST_WINDOW);
    let sma_slow = mean_of_tail(&frame.close, SLOW_WINDOW);
    let trend = if sma_fast > sma_slow {
        TrendPattern::Upward {
            strength_pct: (sma_fast / sma_slow - 1.0) * 100.0,
        }
    } else {
        TrendPattern::Downward {
            strength_pct: (1.0 - sma_fast / sma_slow) * 100.0,
        }
    };

    Some(PricePatterns {
        support_resistance: SupportResistance {
            support,
            resistance,
            current_price,
            position,
        },
        trend,
    })
}
