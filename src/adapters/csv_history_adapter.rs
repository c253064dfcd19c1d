//! CSV file history adapter for offline runs.
//!
//! Reads `{base_path}/{SYMBOL}.csv` with a `date,open,high,low,close,volume`
//! header row.

use crate::domain::error::HhhlError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &str,
) -> Result<T, HhhlError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| HhhlError::Decode {
        endpoint: path.to_string(),
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e: T::Err| HhhlError::Decode {
        endpoint: path.to_string(),
        reason: format!("invalid {} value {:?}: {}", name, raw, e),
    })
}

impl HistoryPort for CsvHistoryAdapter {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, HhhlError> {
        let path = self.csv_path(symbol);
        let shown = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| {
            tracing::debug!(path = %shown, "failed to read history: {}", e);
            HhhlError::NoData {
                symbol: symbol.to_string(),
            }
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| HhhlError::Decode {
                endpoint: shown.clone(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str: String = column(&record, 0, "date", &shown)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                HhhlError::Decode {
                    endpoint: shown.clone(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(PriceBar {
                date,
                open: column(&record, 1, "open", &shown)?,
                high: column(&record, 2, "high", &shown)?,
                low: column(&record, 3, "low", &shown)?,
                close: column(&record, 4, "close", &shown)?,
                volume: column(&record, 5, "volume", &shown)?,
            });
        }

        Ok(PriceSeries::new(symbol, bars))
    }
}
