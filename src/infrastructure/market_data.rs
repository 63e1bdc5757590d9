//! CSV-backed OHLCV series provider.

use crate::domain::market::types::Candle;
use crate::domain::ports::SeriesProvider;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BarRecord {
    timestamp: i64,
    open: Option<Decimal>,
    high: Option<Decimal>,
    low: Option<Decimal>,
    close: Decimal,
    volume: Decimal,
}

/// Reads bars from CSV files with a `timestamp,open,high,low,close,volume`
/// header. Empty `open`/`high`/`low` fields are tolerated (degraded feeds).
///
/// Rooted at either a single file (the symbol argument is ignored) or a
/// directory holding one `<symbol>.csv` per token.
pub struct CsvSeriesProvider {
    path: PathBuf,
}

impl CsvSeriesProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_for(&self, symbol: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{symbol}.csv"))
        } else {
            self.path.clone()
        }
    }
}

impl SeriesProvider for CsvSeriesProvider {
    fn fetch(&self, symbol: &str, bars: usize) -> Result<Vec<Candle>> {
        let file = self.file_for(symbol);
        let mut reader = csv::Reader::from_path(&file)
            .with_context(|| format!("opening series file {}", file.display()))?;

        let mut series = Vec::new();
        for record in reader.deserialize() {
            let bar: BarRecord =
                record.with_context(|| format!("parsing series file {}", file.display()))?;
            series.push(Candle {
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            });
        }

        // keep the most recent rows when more history is on disk than asked for
        if series.len() > bars {
            series.drain(..series.len() - bars);
        }
        debug!(symbol, rows = series.len(), "series loaded");
        Ok(series)
    }
}
