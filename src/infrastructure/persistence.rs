//! JSON-backed model bundle store. The four named parts (regressor,
//! classifier, scaler, forecaster) are persisted as one document and must
//! round-trip exactly; a bundle that deserializes but holds a model without
//! its scaler is rejected as corrupt.

use crate::application::ml::{ModelSet, ModelStore};
use crate::domain::errors::PersistenceError;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};

pub struct JsonModelStore {
    path: PathBuf,
}

impl JsonModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load policy for startup: a missing or unreadable bundle degrades to
    /// the untrained state instead of failing the process.
    pub fn load_or_untrained(&self) -> ModelSet {
        match self.load() {
            Ok(models) => {
                info!(path = %self.path.display(), "model bundle loaded");
                models
            }
            Err(PersistenceError::NotFound { .. }) => {
                info!(
                    path = %self.path.display(),
                    "no model bundle found, starting untrained"
                );
                ModelSet::untrained()
            }
            Err(e) => {
                warn!("falling back to untrained models: {e}");
                ModelSet::untrained()
            }
        }
    }
}

impl ModelStore for JsonModelStore {
    fn save(&self, models: &ModelSet) -> Result<(), PersistenceError> {
        if !models.is_coherent() {
            return Err(PersistenceError::Corrupt {
                reason: "refusing to persist a model without its scaler".to_string(),
            });
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer(BufWriter::new(file), models).map_err(|e| {
            PersistenceError::Corrupt {
                reason: format!("failed to serialize bundle: {e}"),
            }
        })?;
        info!(path = %self.path.display(), "model bundle saved");
        Ok(())
    }

    fn load(&self) -> Result<ModelSet, PersistenceError> {
        if !self.path.exists() {
            return Err(PersistenceError::NotFound {
                path: self.path.display().to_string(),
            });
        }

        let file = File::open(&self.path)?;
        let models: ModelSet =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                PersistenceError::Corrupt {
                    reason: e.to_string(),
                }
            })?;

        if !models.is_coherent() {
            return Err(PersistenceError::Corrupt {
                reason: "bundle holds a model without its scaler".to_string(),
            });
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::{predict, train};
    use crate::config::SignalConfig;
    use crate::domain::market::types::Candle;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::FromPrimitive;
    use std::io::Write;

    fn fixture_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                let price = 100.0 + 8.0 * (t / 6.0).sin() + 0.02 * t;
                Candle {
                    timestamp: 1_700_000_000 + i as i64 * 3600,
                    open: Some(Decimal::from_f64(price * 0.999).unwrap()),
                    high: Some(Decimal::from_f64(price * 1.004).unwrap()),
                    low: Some(Decimal::from_f64(price * 0.996).unwrap()),
                    close: Decimal::from_f64(price).unwrap(),
                    volume: Decimal::from_f64(1_500_000.0).unwrap(),
                }
            })
            .collect()
    }

    #[test]
    fn test_missing_bundle_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonModelStore::new(dir.path().join("models.json"));
        assert!(matches!(
            store.load(),
            Err(PersistenceError::NotFound { .. })
        ));
        assert!(!store.load_or_untrained().is_trained());
    }

    #[test]
    fn test_corrupt_bundle_falls_back_to_untrained() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        let mut file = File::create(&path).unwrap();
        write!(file, "{{ not json").unwrap();

        let store = JsonModelStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(PersistenceError::Corrupt { .. })
        ));
        assert!(!store.load_or_untrained().is_trained());
    }

    #[test]
    fn test_mismatched_bundle_rejected() {
        let config = SignalConfig::default();
        let mut models = train(&fixture_series(150), &config).unwrap();
        models.scaler = None;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        let store = JsonModelStore::new(&path);
        // the store refuses to write an incoherent bundle...
        assert!(matches!(
            store.save(&models),
            Err(PersistenceError::Corrupt { .. })
        ));

        // ...and refuses to read one written behind its back
        let file = File::create(&path).unwrap();
        serde_json::to_writer(BufWriter::new(file), &models).unwrap();
        assert!(matches!(
            store.load(),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_round_trip_preserves_predictions() {
        let config = SignalConfig::default();
        let series = fixture_series(200);
        let models = train(&series, &config).unwrap();

        let frame = crate::application::indicators::compute_indicators(
            &series,
            &config.indicators,
        )
        .unwrap();
        let features = crate::application::features::build_features(&frame)
            .pop()
            .unwrap();
        let before = predict(&models, &features).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let store = JsonModelStore::new(dir.path().join("models.json"));
        store.save(&models).unwrap();
        let restored = store.load().unwrap();
        let after = predict(&restored, &features).unwrap();

        assert_eq!(before.price.regressor, after.price.regressor);
        assert_eq!(before.price.forecaster, after.price.forecaster);
        assert_eq!(before.price.ensemble, after.price.ensemble);
        assert_eq!(
            before.trend.unwrap().prob_bullish,
            after.trend.unwrap().prob_bullish
        );
    }
}
