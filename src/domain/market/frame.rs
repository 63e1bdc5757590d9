/// The augmented series produced by the indicator engine: the raw OHLCV
/// columns plus one column per indicator, all of identical length, with the
/// warm-up fill policy already applied (no NaN anywhere).
///
/// Columns are plain `f64` vectors; `warmup_rows` records how many leading
/// rows still contain zero-filled warm-up values for at least one feature
/// column.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub timestamps: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,

    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_diff: Vec<f64>,
    pub bb_high: Vec<f64>,
    pub bb_low: Vec<f64>,
    pub bb_mid: Vec<f64>,
    pub ema_9: Vec<f64>,
    pub ema_21: Vec<f64>,
    pub sma_50: Vec<f64>,
    pub volume_ema: Vec<f64>,
    pub volume_ratio: Vec<f64>,
    pub price_change: Vec<f64>,
    pub high_low_ratio: Vec<f64>,
    pub close_open_ratio: Vec<f64>,
    pub volatility: Vec<f64>,
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,

    pub warmup_rows: usize,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }
}
