//! End-to-end signal generation: indicators → features → ensemble →
//! fusion → `TradingSignal`.

use crate::application::features::build_features;
use crate::application::indicators::compute_indicators;
use crate::application::ml::{ModelSet, predict};
use crate::application::signal_fusion::{fuse, macd_zone, rsi_zone};
use crate::config::SignalConfig;
use crate::domain::errors::ModelError;
use crate::domain::market::signal::{
    ClassProbabilities, IndicatorReading, TechnicalSignals, TradingSignal, TrendAnalysis,
};
use crate::domain::market::types::Candle;
use tracing::info;

/// Generates one trading signal from the series and a trained (or partially
/// trained, or untrained) model bundle.
///
/// Side-effect free: never trains, never mutates the bundle. Callers decide
/// explicitly when to (re)train. The signal timestamp is the last bar's
/// timestamp so repeated calls on the same input are identical.
pub fn generate_signal(
    series: &[Candle],
    models: &ModelSet,
    config: &SignalConfig,
) -> Result<TradingSignal, ModelError> {
    let frame = compute_indicators(series, &config.indicators)?;
    let features = build_features(&frame);
    let last = frame.len() - 1;
    let latest = &features[last];

    let predictions = predict(models, latest)?;

    let rsi_value = frame.rsi[last];
    let macd_value = frame.macd_diff[last];
    let rsi_signal = rsi_zone(rsi_value, &config.fusion);
    let macd_signal = macd_zone(macd_value);

    let (recommendation, confidence) = fuse(predictions.trend.as_ref(), rsi_signal, macd_signal);

    let trend = match &predictions.trend {
        Some(call) => TrendAnalysis {
            direction: call.direction,
            confidence: call.confidence,
            probabilities: Some(ClassProbabilities {
                bearish: call.prob_bearish,
                bullish: call.prob_bullish,
            }),
        },
        None => TrendAnalysis::neutral(),
    };

    info!(
        recommendation = ?recommendation,
        confidence,
        trend = ?trend.direction,
        "signal generated"
    );

    Ok(TradingSignal {
        timestamp: frame.timestamps[last],
        last_price: frame.close[last],
        price_prediction: predictions.price,
        trend,
        technical: TechnicalSignals {
            rsi: IndicatorReading {
                value: rsi_value,
                signal: rsi_signal,
            },
            macd: IndicatorReading {
                value: macd_value,
                signal: macd_signal,
            },
        },
        recommendation,
        confidence,
    })
}
