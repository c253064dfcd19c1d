//! Yahoo Finance chart API adapter for maximum-range daily history.

use chrono::DateTime;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::adapters::http::{build_client, get_json, join_url};
use crate::domain::error::HhhlError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::history_port::HistoryPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub struct YahooHistoryAdapter {
    client: Client,
    base_url: String,
}

impl YahooHistoryAdapter {
    pub fn new(base_url: Option<String>) -> Result<Self, HhhlError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

impl HistoryPort for YahooHistoryAdapter {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, HhhlError> {
        let body = get_json(
            &self.client,
            "yahoo chart",
            &join_url(&self.base_url, &format!("v8/finance/chart/{symbol}")),
            &[("range", "max"), ("interval", "1d")],
            None,
        )?;
        parse_chart(symbol, body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

/// Converts a chart response into a series. Rows with any missing OHLC value
/// are dropped; a response without rows is `NoData`.
pub fn parse_chart(symbol: &str, body: serde_json::Value) -> Result<PriceSeries, HhhlError> {
    let response: ChartResponse = serde_json::from_value(body).map_err(|e| HhhlError::Decode {
        endpoint: "yahoo chart".into(),
        reason: e.to_string(),
    })?;

    if let Some(error) = response.chart.error.filter(|e| !e.is_null()) {
        return Err(HhhlError::Decode {
            endpoint: "yahoo chart".into(),
            reason: error.to_string(),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| HhhlError::NoData {
            symbol: symbol.to_string(),
        })?;
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars: Vec<PriceBar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: (*quote.open.get(i)?)?,
                high: (*quote.high.get(i)?)?,
                low: (*quote.low.get(i)?)?,
                close: (*quote.close.get(i)?)?,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    if bars.is_empty() {
        return Err(HhhlError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(PriceSeries::new(symbol, bars))
}
