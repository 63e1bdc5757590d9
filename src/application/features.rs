//! Feature builder: projects the indicator frame onto the canonical ordered
//! feature columns defined by the registry.

use crate::domain::market::frame::IndicatorFrame;
use crate::domain::ml::feature_registry;
use tracing::warn;

/// Builds one feature row per bar, in registry column order.
///
/// Zero-filled warm-up rows are kept (dropping them would desynchronize
/// features from their labels) but flagged, since they dilute the training
/// set when the caller passes barely enough history.
pub fn build_features(frame: &IndicatorFrame) -> Vec<Vec<f64>> {
    if frame.warmup_rows > 0 {
        warn!(
            rows = frame.warmup_rows,
            "feature matrix includes zero-filled warm-up rows"
        );
    }
    (0..frame.len())
        .map(|i| feature_registry::feature_row(frame, i))
        .collect()
}
