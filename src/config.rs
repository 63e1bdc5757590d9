use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Indicator window configuration. Defaults match the standard parameter set
/// (RSI-14, MACD 12/26/9, Bollinger 20/2σ) used by the signal pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub sma_trend_period: usize,
    pub volume_ema_period: usize,
    pub volatility_period: usize,
    pub range_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
            ema_fast_period: 9,
            ema_slow_period: 21,
            sma_trend_period: 50,
            volume_ema_period: 20,
            volatility_period: 20,
            range_period: 20,
        }
    }
}

impl IndicatorConfig {
    /// Largest rolling window: the minimum series length the indicator
    /// engine accepts.
    pub fn min_bars(&self) -> usize {
        [
            self.rsi_period,
            self.macd_slow_period + self.macd_signal_period,
            self.bb_period,
            self.ema_fast_period,
            self.ema_slow_period,
            self.sma_trend_period,
            self.volume_ema_period,
            self.volatility_period,
            self.range_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Held-out fraction of the chronological split
    pub test_fraction: f64,
    /// Look-ahead horizon (bars) for the trend label
    pub trend_horizon: usize,
    /// Minimum forward return counted as bullish
    pub trend_threshold: f64,
    pub n_trees: usize,
    pub max_depth: u16,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            trend_horizon: 5,
            trend_threshold: 0.02,
            n_trees: 100,
            max_depth: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    pub daily_seasonality: bool,
    pub weekly_seasonality: bool,
    pub yearly_seasonality: bool,
    pub n_changepoints: usize,
    /// Trend-changepoint flexibility; smaller values give a stiffer trend
    pub changepoint_prior_scale: f64,
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            daily_seasonality: true,
            weekly_seasonality: true,
            yearly_seasonality: false,
            n_changepoints: 25,
            changepoint_prior_scale: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

/// Top-level configuration for the signal pipeline. Every field has a
/// default, so a partial TOML file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub indicators: IndicatorConfig,
    pub training: TrainingConfig,
    pub forecaster: ForecasterConfig,
    pub fusion: FusionConfig,
}

impl SignalConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = SignalConfig::default();
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.indicators.macd_slow_period, 26);
        assert_eq!(config.indicators.sma_trend_period, 50);
        assert_eq!(config.indicators.min_bars(), 50);
        assert_eq!(config.training.test_fraction, 0.2);
        assert_eq!(config.training.trend_horizon, 5);
        assert_eq!(config.training.trend_threshold, 0.02);
        assert!(config.forecaster.daily_seasonality);
        assert!(!config.forecaster.yearly_seasonality);
        assert_eq!(config.fusion.rsi_oversold, 30.0);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config: SignalConfig = toml::from_str(
            r#"
            [training]
            trend_threshold = 0.05

            [fusion]
            rsi_overbought = 75.0
            "#,
        )
        .unwrap();
        assert_eq!(config.training.trend_threshold, 0.05);
        assert_eq!(config.fusion.rsi_overbought, 75.0);
        // untouched sections keep their defaults
        assert_eq!(config.training.n_trees, 100);
        assert_eq!(config.indicators.bb_period, 20);
    }
}
