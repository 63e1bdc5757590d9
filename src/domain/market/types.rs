use crate::domain::errors::SeriesError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// One OHLCV bar for a fixed time interval.
///
/// `open`/`high`/`low` may be absent in degraded feeds; consumers substitute
/// `close` for missing fields rather than rejecting the bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: i64,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    pub fn new(timestamp: i64, close: Decimal, volume: Decimal) -> Self {
        Self {
            timestamp,
            open: None,
            high: None,
            low: None,
            close,
            volume,
        }
    }

    /// Open price, falling back to close for degraded feeds
    pub fn effective_open(&self) -> Decimal {
        self.open.unwrap_or(self.close)
    }

    pub fn effective_high(&self) -> Decimal {
        self.high.unwrap_or(self.close)
    }

    pub fn effective_low(&self) -> Decimal {
        self.low.unwrap_or(self.close)
    }

    pub fn close_f64(&self) -> f64 {
        self.close.to_f64().unwrap_or(0.0)
    }

    pub fn volume_f64(&self) -> f64 {
        self.volume.to_f64().unwrap_or(0.0)
    }
}

/// Validates the series invariants before any indicator computation:
/// strictly increasing timestamps, positive prices, non-negative volume.
pub fn validate_series(series: &[Candle]) -> Result<(), SeriesError> {
    let mut prev_ts: Option<i64> = None;

    for (index, bar) in series.iter().enumerate() {
        if let Some(prev) = prev_ts {
            if bar.timestamp == prev {
                return Err(SeriesError::DuplicateTimestamp {
                    timestamp: bar.timestamp,
                    index,
                });
            }
            if bar.timestamp < prev {
                return Err(SeriesError::NonMonotonicTimestamp { index });
            }
        }
        prev_ts = Some(bar.timestamp);

        let prices = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", Some(bar.close)),
        ];
        for (field, price) in prices {
            if let Some(p) = price {
                if p <= Decimal::ZERO {
                    return Err(SeriesError::NonPositivePrice { field, index });
                }
            }
        }

        if bar.volume < Decimal::ZERO {
            return Err(SeriesError::NegativeVolume { index });
        }
    }

    Ok(())
}
