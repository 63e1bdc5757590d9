use crate::domain::market::frame::IndicatorFrame;

/// Ordered list of feature column names.
/// Scaling parameters and model weights are positional, so this order is a
/// compatibility contract between training and inference. Any change here
/// invalidates every persisted model bundle.
pub const FEATURE_NAMES: &[&str] = &[
    "rsi",
    "macd",
    "macd_signal",
    "macd_diff",
    "bb_high",
    "bb_low",
    "bb_mid",
    "ema_9",
    "ema_21",
    "sma_50",
    "volume_ratio",
    "price_change",
    "high_low_ratio",
    "close_open_ratio",
    "volatility",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Extracts one feature row from the frame, in registry order.
pub fn feature_row(frame: &IndicatorFrame, idx: usize) -> Vec<f64> {
    vec![
        frame.rsi[idx],
        frame.macd[idx],
        frame.macd_signal[idx],
        frame.macd_diff[idx],
        frame.bb_high[idx],
        frame.bb_low[idx],
        frame.bb_mid[idx],
        frame.ema_9[idx],
        frame.ema_21[idx],
        frame.sma_50[idx],
        frame.volume_ratio[idx],
        frame.price_change[idx],
        frame.high_low_ratio[idx],
        frame.close_open_ratio[idx],
        frame.volatility[idx],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_row_frame() -> IndicatorFrame {
        IndicatorFrame {
            timestamps: vec![0],
            open: vec![1.0],
            high: vec![1.0],
            low: vec![1.0],
            close: vec![1.0],
            volume: vec![1.0],
            rsi: vec![70.0],
            macd: vec![0.1],
            macd_signal: vec![0.2],
            macd_diff: vec![0.3],
            bb_high: vec![1.1],
            bb_low: vec![0.9],
            bb_mid: vec![1.0],
            ema_9: vec![1.01],
            ema_21: vec![1.02],
            sma_50: vec![1.03],
            volume_ema: vec![1.0],
            volume_ratio: vec![1.5],
            price_change: vec![0.01],
            high_low_ratio: vec![1.001],
            close_open_ratio: vec![0.999],
            volatility: vec![0.05],
            support: vec![0.9],
            resistance: vec![1.1],
            warmup_rows: 0,
        }
    }

    #[test]
    fn test_feature_row_length_matches_registry() {
        let frame = single_row_frame();
        assert_eq!(feature_row(&frame, 0).len(), FEATURE_COUNT);
        assert_eq!(FEATURE_COUNT, 15);
    }

    #[test]
    fn test_feature_order_is_stable() {
        let frame = single_row_frame();
        let row = feature_row(&frame, 0);
        // rsi leads, volatility trails
        assert_eq!(row[0], 70.0);
        assert_eq!(row[14], 0.05);
        // bb columns sit in the middle in high/low/mid order
        assert_eq!(row[4], 1.1);
        assert_eq!(row[5], 0.9);
        assert_eq!(row[6], 1.0);
    }
}
