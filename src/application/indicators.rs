//! Indicator engine: turns a validated OHLCV series into the augmented
//! indicator frame consumed by the feature builder.
//!
//! Every indicator is computed bar-by-bar with only data up to and including
//! the current row. Rows inside an indicator's warm-up window are undefined;
//! the frame forward-fills each column from its first defined value and
//! zero-fills whatever is still undefined, so the output never contains NaN.

use crate::config::IndicatorConfig;
use crate::domain::errors::SeriesError;
use crate::domain::market::frame::IndicatorFrame;
use crate::domain::market::types::{Candle, validate_series};
use rust_decimal::prelude::ToPrimitive;
use ta::Next;
use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, Maximum, Minimum,
    MovingAverageConvergenceDivergence, RelativeStrengthIndex, SimpleMovingAverage,
    StandardDeviation,
};

/// Forward-fill then zero-fill: interior gaps inherit the previous defined
/// value, leading gaps become 0.0. This is the training-set fill contract.
fn fill_column(column: Vec<Option<f64>>) -> Vec<f64> {
    let mut filled = Vec::with_capacity(column.len());
    let mut last: Option<f64> = None;
    for value in column {
        if value.is_some() {
            last = value;
        }
        filled.push(last.unwrap_or(0.0));
    }
    filled
}

pub fn compute_indicators(
    series: &[Candle],
    config: &IndicatorConfig,
) -> Result<IndicatorFrame, SeriesError> {
    validate_series(series)?;

    let required = config.min_bars();
    let n = series.len();
    if n < required {
        return Err(SeriesError::InsufficientData {
            required,
            actual: n,
        });
    }

    let timestamps: Vec<i64> = series.iter().map(|c| c.timestamp).collect();
    let open: Vec<f64> = series
        .iter()
        .map(|c| c.effective_open().to_f64().unwrap_or(0.0))
        .collect();
    let high: Vec<f64> = series
        .iter()
        .map(|c| c.effective_high().to_f64().unwrap_or(0.0))
        .collect();
    let low: Vec<f64> = series
        .iter()
        .map(|c| c.effective_low().to_f64().unwrap_or(0.0))
        .collect();
    let close: Vec<f64> = series.iter().map(|c| c.close_f64()).collect();
    let volume: Vec<f64> = series.iter().map(|c| c.volume_f64()).collect();

    let mut rsi_ind =
        RelativeStrengthIndex::new(config.rsi_period).expect("invalid RSI period");
    let mut macd_ind = MovingAverageConvergenceDivergence::new(
        config.macd_fast_period,
        config.macd_slow_period,
        config.macd_signal_period,
    )
    .expect("invalid MACD periods");
    let mut bb_ind = BollingerBands::new(config.bb_period, config.bb_std_dev)
        .expect("invalid Bollinger parameters");
    let mut ema_fast_ind =
        ExponentialMovingAverage::new(config.ema_fast_period).expect("invalid EMA period");
    let mut ema_slow_ind =
        ExponentialMovingAverage::new(config.ema_slow_period).expect("invalid EMA period");
    let mut sma_trend_ind =
        SimpleMovingAverage::new(config.sma_trend_period).expect("invalid SMA period");
    let mut volume_ema_ind =
        ExponentialMovingAverage::new(config.volume_ema_period).expect("invalid EMA period");
    let mut volatility_ind =
        StandardDeviation::new(config.volatility_period).expect("invalid volatility period");
    let mut support_ind = Minimum::new(config.range_period).expect("invalid range period");
    let mut resistance_ind = Maximum::new(config.range_period).expect("invalid range period");

    let mut rsi = vec![None; n];
    let mut macd = vec![None; n];
    let mut macd_signal = vec![None; n];
    let mut macd_diff = vec![None; n];
    let mut bb_high = vec![None; n];
    let mut bb_low = vec![None; n];
    let mut bb_mid = vec![None; n];
    let mut ema_9 = vec![None; n];
    let mut ema_21 = vec![None; n];
    let mut sma_50 = vec![None; n];
    let mut volume_ema = vec![None; n];
    let mut volume_ratio = vec![None; n];
    let mut price_change = vec![None; n];
    let mut high_low_ratio = vec![None; n];
    let mut close_open_ratio = vec![None; n];
    let mut volatility = vec![None; n];
    let mut support = vec![None; n];
    let mut resistance = vec![None; n];

    // First row at which the MACD signal line has seen a full slow EMA plus
    // a full signal EMA worth of bars.
    let macd_signal_start = config.macd_slow_period + config.macd_signal_period - 2;

    for i in 0..n {
        let bars_seen = i + 1;

        let rsi_val = rsi_ind.next(close[i]);
        if bars_seen >= config.rsi_period {
            rsi[i] = Some(rsi_val);
        }

        let macd_val = macd_ind.next(close[i]);
        if bars_seen >= config.macd_slow_period {
            macd[i] = Some(macd_val.macd);
        }
        if i >= macd_signal_start {
            macd_signal[i] = Some(macd_val.signal);
            macd_diff[i] = Some(macd_val.histogram);
        }

        let bb_val = bb_ind.next(close[i]);
        if bars_seen >= config.bb_period {
            bb_high[i] = Some(bb_val.upper);
            bb_low[i] = Some(bb_val.lower);
            bb_mid[i] = Some(bb_val.average);
        }

        let ema_fast_val = ema_fast_ind.next(close[i]);
        if bars_seen >= config.ema_fast_period {
            ema_9[i] = Some(ema_fast_val);
        }

        let ema_slow_val = ema_slow_ind.next(close[i]);
        if bars_seen >= config.ema_slow_period {
            ema_21[i] = Some(ema_slow_val);
        }

        let sma_val = sma_trend_ind.next(close[i]);
        if bars_seen >= config.sma_trend_period {
            sma_50[i] = Some(sma_val);
        }

        let volume_ema_val = volume_ema_ind.next(volume[i]);
        if bars_seen >= config.volume_ema_period {
            volume_ema[i] = Some(volume_ema_val);
            if volume_ema_val > 0.0 {
                volume_ratio[i] = Some(volume[i] / volume_ema_val);
            }
        }

        if i >= 1 && close[i - 1] > 0.0 {
            price_change[i] = Some(close[i] / close[i - 1] - 1.0);
        }

        if low[i] > 0.0 {
            high_low_ratio[i] = Some(high[i] / low[i]);
        }
        if open[i] > 0.0 {
            close_open_ratio[i] = Some(close[i] / open[i]);
        }

        let volatility_val = volatility_ind.next(close[i]);
        if bars_seen >= config.volatility_period {
            volatility[i] = Some(volatility_val);
        }

        let support_val = support_ind.next(low[i]);
        let resistance_val = resistance_ind.next(high[i]);
        if bars_seen >= config.range_period {
            support[i] = Some(support_val);
            resistance[i] = Some(resistance_val);
        }
    }

    // First row where every feature column is defined pre-fill; everything
    // before it carries at least one zero-filled warm-up value.
    let feature_columns: [&Vec<Option<f64>>; 15] = [
        &rsi,
        &macd,
        &macd_signal,
        &macd_diff,
        &bb_high,
        &bb_low,
        &bb_mid,
        &ema_9,
        &ema_21,
        &sma_50,
        &volume_ratio,
        &price_change,
        &high_low_ratio,
        &close_open_ratio,
        &volatility,
    ];
    let warmup_rows = (0..n)
        .find(|&i| feature_columns.iter().all(|col| col[i].is_some()))
        .unwrap_or(n);

    Ok(IndicatorFrame {
        timestamps,
        open,
        high,
        low,
        close,
        volume,
        rsi: fill_column(rsi),
        macd: fill_column(macd),
        macd_signal: fill_column(macd_signal),
        macd_diff: fill_column(macd_diff),
        bb_high: fill_column(bb_high),
        bb_low: fill_column(bb_low),
        bb_mid: fill_column(bb_mid),
        ema_9: fill_column(ema_9),
        ema_21: fill_column(ema_21),
        sma_50: fill_column(sma_50),
        volume_ema: fill_column(volume_ema),
        volume_ratio: fill_column(volume_ratio),
        price_change: fill_column(price_change),
        high_low_ratio: fill_column(high_low_ratio),
        close_open_ratio: fill_column(close_open_ratio),
        volatility: fill_column(volatility),
        support: fill_column(support),
        resistance: fill_column(resistance),
        warmup_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::FromPrimitive;

    /// Deterministic fixture: a slow uptrend with a superimposed oscillation
    /// and varying volume. No randomness, so indicator values are repeatable.
    fn fixture_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                let price = 100.0 + 0.1 * t + 3.0 * (t / 7.0).sin();
                let close = Decimal::from_f64(price).unwrap();
                let spread = Decimal::from_f64(price * 0.01).unwrap();
                Candle {
                    timestamp: 1_700_000_000 + i as i64 * 3600,
                    open: Some(close - spread / Decimal::TWO),
                    high: Some(close + spread),
                    low: Some(close - spread),
                    close,
                    volume: Decimal::from_f64(1_000_000.0 + 50_000.0 * (t / 5.0).cos())
                        .unwrap(),
                }
            })
            .collect()
    }

    #[test]
    fn test_rejects_short_series() {
        let series = fixture_series(30);
        let err = compute_indicators(&series, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::InsufficientData {
                required: 50,
                actual: 30
            }
        ));
    }

    #[test]
    fn test_fill_policy_is_total() {
        let series = fixture_series(80);
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        assert_eq!(frame.len(), 80);

        let columns = [
            &frame.rsi,
            &frame.macd,
            &frame.macd_signal,
            &frame.macd_diff,
            &frame.bb_high,
            &frame.bb_low,
            &frame.bb_mid,
            &frame.ema_9,
            &frame.ema_21,
            &frame.sma_50,
            &frame.volume_ema,
            &frame.volume_ratio,
            &frame.price_change,
            &frame.high_low_ratio,
            &frame.close_open_ratio,
            &frame.volatility,
            &frame.support,
            &frame.resistance,
        ];
        for col in columns {
            assert!(col.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_rsi_bounded() {
        let series = fixture_series(120);
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        assert!(frame.rsi.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let series = fixture_series(120);
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        for i in 0..frame.len() {
            assert!(frame.bb_high[i] >= frame.bb_mid[i]);
            assert!(frame.bb_mid[i] >= frame.bb_low[i]);
        }
    }

    #[test]
    fn test_warmup_rows_zero_filled() {
        let series = fixture_series(80);
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();

        // SMA-50 is the longest window: rows before index 49 are zero-filled
        assert_eq!(frame.sma_50[0], 0.0);
        assert_eq!(frame.sma_50[48], 0.0);
        assert!(frame.sma_50[49] > 0.0);
        assert_eq!(frame.warmup_rows, 49);

        // first percent-change has no predecessor
        assert_eq!(frame.price_change[0], 0.0);
        assert_ne!(frame.price_change[1], 0.0);
    }

    #[test]
    fn test_support_below_resistance() {
        let series = fixture_series(90);
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        for i in 20..frame.len() {
            assert!(frame.support[i] <= frame.resistance[i]);
        }
    }

    #[test]
    fn test_missing_ohlc_degrades_ratios() {
        let series: Vec<Candle> = fixture_series(60)
            .into_iter()
            .map(|mut c| {
                c.open = None;
                c.high = None;
                c.low = None;
                c
            })
            .collect();
        let frame = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        // with high == low == open == close, both ratios collapse to 1.0
        assert!(frame.high_low_ratio.iter().all(|v| (v - 1.0).abs() < 1e-12));
        assert!(
            frame
                .close_open_ratio
                .iter()
                .all(|v| (v - 1.0).abs() < 1e-12)
        );
    }

    #[test]
    fn test_rejects_malformed_series() {
        let mut series = fixture_series(60);
        series[10].timestamp = series[9].timestamp;
        assert!(matches!(
            compute_indicators(&series, &IndicatorConfig::default()),
            Err(SeriesError::DuplicateTimestamp { index: 10, .. })
        ));
    }

    #[test]
    fn test_deterministic_across_calls() {
        let series = fixture_series(100);
        let a = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        let b = compute_indicators(&series, &IndicatorConfig::default()).unwrap();
        assert_eq!(a.rsi, b.rsi);
        assert_eq!(a.macd_diff, b.macd_diff);
        assert_eq!(a.volatility, b.volatility);
    }
}
