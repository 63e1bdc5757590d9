use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Column-wise standardization (zero mean, unit variance).
///
/// Fit only on the chronological training partition and reused verbatim at
/// inference; the fitted parameters travel inside the model bundle so model
/// weights and scaling can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);

        for col in 0..width {
            let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            let mean = Statistics::mean(&column);
            let std_dev = Statistics::population_std_dev(&column);
            means.push(mean);
            // constant columns pass through unscaled
            scales.push(if std_dev > 0.0 { std_dev } else { 1.0 });
        }

        Self { means, scales }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_partition_standardized() {
        let rows = vec![
            vec![1.0, 10.0],
            vec![2.0, 20.0],
            vec![3.0, 30.0],
            vec![4.0, 40.0],
        ];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform(&rows);

        for col in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[col]).sum::<f64>() / scaled.len() as f64;
            let var: f64 =
                scaled.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_unscaled() {
        let rows = vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_row(&[5.0, 2.0]);
        assert_eq!(scaled[0], 0.0);
        assert!(scaled[1].abs() < 1e-12);
    }

    #[test]
    fn test_reused_verbatim_at_inference() {
        let train = vec![vec![0.0], vec![10.0]];
        let scaler = StandardScaler::fit(&train);
        // a value outside the training range scales with training parameters
        let scaled = scaler.transform_row(&[20.0]);
        assert!((scaled[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trips_through_serde() {
        let scaler = StandardScaler::fit(&[vec![1.0, 2.0], vec![3.0, 6.0]]);
        let json = serde_json::to_string(&scaler).unwrap();
        let restored: StandardScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(scaler, restored);
    }
}
