use crate::domain::errors::ModelError;
use crate::domain::market::signal::TrendDirection;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};

/// One trend call: discrete direction plus both class probabilities.
/// Confidence is the probability of the predicted class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendCall {
    pub direction: TrendDirection,
    pub confidence: f64,
    pub prob_bearish: f64,
    pub prob_bullish: f64,
}

/// Logistic-regression classifier over scaled features. Label 1 means the
/// close a fixed horizon ahead exceeds the current close by more than the
/// configured threshold.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrendClassifier {
    model: LogisticRegression<f64, u32, DenseMatrix<f64>, Vec<u32>>,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl TrendClassifier {
    pub fn fit(x: &[Vec<f64>], y: &[u32]) -> Result<Self, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| {
            ModelError::TrainingFailed {
                stage: "trend classifier",
                reason: e.to_string(),
            }
        })?;

        let model = LogisticRegression::fit(
            &matrix,
            &y.to_vec(),
            LogisticRegressionParameters::default(),
        )
        .map_err(|e| ModelError::TrainingFailed {
            stage: "trend classifier",
            reason: e.to_string(),
        })?;

        Ok(Self { model })
    }

    /// Probability of the bullish class from the fitted decision function.
    fn prob_bullish(&self, features: &[f64]) -> f64 {
        let coef = self.model.coefficients();
        let (rows, _cols) = coef.shape();
        let weight = |j: usize| {
            if rows == 1 {
                *coef.get((0, j))
            } else {
                *coef.get((j, 0))
            }
        };

        let mut z = *self.model.intercept().get((0, 0));
        for (j, x) in features.iter().enumerate() {
            z += weight(j) * x;
        }
        sigmoid(z)
    }

    pub fn predict_one(&self, features: &[f64]) -> TrendCall {
        let prob_bullish = self.prob_bullish(features);
        let prob_bearish = 1.0 - prob_bullish;
        let direction = if prob_bullish >= 0.5 {
            TrendDirection::Bullish
        } else {
            TrendDirection::Bearish
        };
        TrendCall {
            direction,
            confidence: prob_bullish.max(prob_bearish),
            prob_bearish,
            prob_bullish,
        }
    }

    pub fn predict_classes(&self, x: &[Vec<f64>]) -> Result<Vec<u32>, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| {
            ModelError::PredictionFailed {
                stage: "trend classifier",
                reason: e.to_string(),
            }
        })?;
        self.model
            .predict(&matrix)
            .map_err(|e| ModelError::PredictionFailed {
                stage: "trend classifier",
                reason: e.to_string(),
            })
    }
}
