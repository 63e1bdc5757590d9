use crate::domain::market::types::Candle;
use anyhow::Result;

/// External OHLCV series collaborator. Implementations are fallible,
/// retryable black boxes; they may return fewer bars than requested near the
/// start of available history, always in ascending time order.
pub trait SeriesProvider: Send + Sync {
    fn fetch(&self, symbol: &str, bars: usize) -> Result<Vec<Candle>>;
}
