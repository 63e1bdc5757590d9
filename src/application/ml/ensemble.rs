//! Predictor ensemble: training, inference, and the model bundle.
//!
//! Three independently-failable members (price regressor, trend classifier,
//! seasonal-trend forecaster) share one feature scaler. A member whose fit
//! fails is left absent and excluded from inference; it never fails the
//! request. The bundle is an owned value threaded through `train`/`predict`
//! so concurrent callers share no hidden state.

use crate::application::features::build_features;
use crate::application::indicators::compute_indicators;
use crate::application::ml::forecaster::SeasonalTrendForecaster;
use crate::application::ml::price_regressor::PriceRegressor;
use crate::application::ml::scaler::StandardScaler;
use crate::application::ml::trend_classifier::{TrendCall, TrendClassifier};
use crate::config::{SignalConfig, TrainingConfig};
use crate::domain::errors::{ModelError, PersistenceError};
use crate::domain::market::signal::PricePredictions;
use crate::domain::market::types::Candle;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The four named parts persisted and reloaded as one unit. Model weights are
/// positional over scaled features, so a bundle holding a model without its
/// scaler is incoherent.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSet {
    pub regressor: Option<PriceRegressor>,
    pub classifier: Option<TrendClassifier>,
    pub scaler: Option<StandardScaler>,
    pub forecaster: Option<SeasonalTrendForecaster>,
}

impl ModelSet {
    pub fn untrained() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.regressor.is_some() || self.classifier.is_some() || self.forecaster.is_some()
    }

    /// A scaled-feature model without its scaler cannot be used.
    pub fn is_coherent(&self) -> bool {
        if self.regressor.is_some() || self.classifier.is_some() {
            self.scaler.is_some()
        } else {
            true
        }
    }
}

/// Model bundle persistence collaborator.
pub trait ModelStore: Send + Sync {
    fn save(&self, models: &ModelSet) -> Result<(), PersistenceError>;
    fn load(&self) -> Result<ModelSet, PersistenceError>;
}

/// Ensemble output for one feature row. Fields are named per member, so the
/// record layout is deterministic regardless of member evaluation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionSet {
    pub price: PricePredictions,
    pub trend: Option<TrendCall>,
}

fn rmse(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = predicted.len().max(1) as f64;
    (predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / n)
        .sqrt()
}

fn mae(predicted: &[f64], actual: &[f64]) -> f64 {
    let n = predicted.len().max(1) as f64;
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum::<f64>()
        / n
}

fn r2(predicted: &[f64], actual: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 }
}

fn fit_regressor_member(
    scaled: &[Vec<f64>],
    targets: &[f64],
    split: usize,
    config: &TrainingConfig,
) -> Option<PriceRegressor> {
    let fitted = PriceRegressor::fit(&scaled[..split], &targets[..split], config);
    match fitted {
        Ok(model) => {
            if split < scaled.len() {
                if let Ok(predicted) = model.predict(&scaled[split..]) {
                    let actual = &targets[split..];
                    info!(
                        test_n = actual.len(),
                        rmse = rmse(&predicted, actual),
                        mae = mae(&predicted, actual),
                        r2 = r2(&predicted, actual),
                        "price regressor trained"
                    );
                }
            }
            Some(model)
        }
        Err(e) => {
            warn!("price regressor left untrained: {e}");
            None
        }
    }
}

fn fit_classifier_member(
    scaled: &[Vec<f64>],
    labels: &[u32],
    split: usize,
) -> Option<TrendClassifier> {
    let train_labels = &labels[..split];
    if !train_labels.contains(&0) || !train_labels.contains(&1) {
        warn!("trend classifier left untrained: training partition has a single class");
        return None;
    }

    match TrendClassifier::fit(&scaled[..split], train_labels) {
        Ok(model) => {
            if split < scaled.len() {
                if let Ok(classes) = model.predict_classes(&scaled[split..]) {
                    let actual = &labels[split..];
                    let correct = classes.iter().zip(actual).filter(|(a, b)| a == b).count();
                    info!(
                        test_n = actual.len(),
                        accuracy = correct as f64 / actual.len().max(1) as f64,
                        "trend classifier trained"
                    );
                }
            }
            Some(model)
        }
        Err(e) => {
            warn!("trend classifier left untrained: {e}");
            None
        }
    }
}

/// Fits all three members on a historical series and returns the bundle.
///
/// The split is chronological (no shuffling) with the configured held-out
/// fraction; the scaler is fit on the training partition only. Member fits
/// are independent and run in parallel.
pub fn train(series: &[Candle], config: &SignalConfig) -> Result<ModelSet, ModelError> {
    let required = config.indicators.min_bars() * 2;
    if series.len() < required {
        return Err(ModelError::InsufficientTrainingData {
            required,
            actual: series.len(),
        });
    }

    let frame = compute_indicators(series, &config.indicators)?;
    let features = build_features(&frame);
    let n = frame.len();
    let train_fraction = 1.0 - config.training.test_fraction;

    // Regression target: next-period close (label = close shifted by -1 row)
    let reg_len = n - 1;
    let reg_targets: Vec<f64> = frame.close[1..].to_vec();
    let reg_split = ((reg_len as f64) * train_fraction).floor() as usize;

    // Trend label: close `horizon` bars ahead beats current close by more
    // than the threshold
    let horizon = config.training.trend_horizon;
    let cls_len = n.saturating_sub(horizon);
    let threshold = config.training.trend_threshold;
    let cls_labels: Vec<u32> = (0..cls_len)
        .map(|i| {
            let future_return = frame.close[i + horizon] / frame.close[i] - 1.0;
            u32::from(future_return > threshold)
        })
        .collect();
    let cls_split = ((cls_len as f64) * train_fraction).floor() as usize;

    if reg_split == 0 || cls_split == 0 {
        return Err(ModelError::InsufficientTrainingData {
            required,
            actual: series.len(),
        });
    }

    let scaler = StandardScaler::fit(&features[..reg_split]);
    let scaled = scaler.transform(&features);

    let (regressor, (classifier, forecaster)) = rayon::join(
        || fit_regressor_member(&scaled[..reg_len], &reg_targets, reg_split, &config.training),
        || {
            rayon::join(
                || fit_classifier_member(&scaled[..cls_len], &cls_labels, cls_split),
                || match SeasonalTrendForecaster::fit(
                    &frame.timestamps,
                    &frame.close,
                    &config.forecaster,
                ) {
                    Ok(model) => {
                        info!(bars = n, "forecaster trained");
                        Some(model)
                    }
                    Err(e) => {
                        warn!("forecaster left untrained: {e}");
                        None
                    }
                },
            )
        },
    );

    Ok(ModelSet {
        regressor,
        classifier,
        scaler: Some(scaler),
        forecaster,
    })
}

/// Runs every present member on one unscaled feature row.
///
/// Absent members are excluded rather than treated as errors; with no
/// members at all the result is explicitly empty. The ensemble price is the
/// arithmetic mean of the present price-producing members.
pub fn predict(models: &ModelSet, features: &[f64]) -> Result<PredictionSet, ModelError> {
    let needs_scaler = models.regressor.is_some() || models.classifier.is_some();
    let scaled = if needs_scaler {
        let scaler = models
            .scaler
            .as_ref()
            .ok_or(ModelError::MissingModel { member: "scaler" })?;
        if features.len() != scaler.n_features() {
            return Err(ModelError::PredictionFailed {
                stage: "ensemble",
                reason: format!(
                    "feature width {} does not match scaler width {}",
                    features.len(),
                    scaler.n_features()
                ),
            });
        }
        Some(scaler.transform_row(features))
    } else {
        None
    };

    let mut price = PricePredictions::default();
    if let (Some(regressor), Some(x)) = (&models.regressor, &scaled) {
        price.regressor = Some(regressor.predict_one(x)?);
    }
    if let Some(forecaster) = &models.forecaster {
        price.forecaster = Some(forecaster.forecast_next()?);
    }

    let present: Vec<f64> = [price.regressor, price.forecaster]
        .into_iter()
        .flatten()
        .collect();
    if !present.is_empty() {
        price.ensemble = Some(present.iter().sum::<f64>() / present.len() as f64);
    }

    let trend = match (&models.classifier, &scaled) {
        (Some(classifier), Some(x)) => Some(classifier.predict_one(x)),
        _ => None,
    };

    Ok(PredictionSet { price, trend })
}
