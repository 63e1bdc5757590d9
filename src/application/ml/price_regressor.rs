use crate::config::TrainingConfig;
use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

/// Random-forest regressor over scaled features; target is the next-period
/// close price. The seed is fixed so retraining on identical data reproduces
/// the same forest.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRegressor {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl PriceRegressor {
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &TrainingConfig) -> Result<Self, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| {
            ModelError::TrainingFailed {
                stage: "price regressor",
                reason: e.to_string(),
            }
        })?;

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(config.n_trees)
            .with_max_depth(config.max_depth)
            .with_seed(config.seed);

        let model = RandomForestRegressor::fit(&matrix, &y.to_vec(), params).map_err(|e| {
            ModelError::TrainingFailed {
                stage: "price regressor",
                reason: e.to_string(),
            }
        })?;

        Ok(Self { model })
    }

    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.predict(&[features.to_vec()])?
            .first()
            .copied()
            .ok_or(ModelError::PredictionFailed {
                stage: "price regressor",
                reason: "no prediction returned".to_string(),
            })
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| {
            ModelError::PredictionFailed {
                stage: "price regressor",
                reason: e.to_string(),
            }
        })?;
        self.model
            .predict(&matrix)
            .map_err(|e| ModelError::PredictionFailed {
                stage: "price regressor",
                reason: e.to_string(),
            })
    }
}
