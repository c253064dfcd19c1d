#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use hhhl::domain::error::HhhlError;
pub use hhhl::domain::ohlcv::{PriceBar, PriceSeries};
use hhhl::domain::profile::CompanyProfile;
use hhhl::domain::report::ChartImage;
use hhhl::ports::chart_port::ChartPort;
use hhhl::ports::history_port::HistoryPort;
use hhhl::ports::market_data_port::{CandidateSymbol, CompanyDetailsPort, MarketDataPort};
use std::cell::RefCell;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory exchange-data provider.
pub struct MockMarket {
    pub symbols: Vec<String>,
    pub profiles: HashMap<String, CompanyProfile>,
    pub prices: HashMap<String, f64>,
    pub profile_errors: Vec<String>,
    pub listing_error: Option<String>,
    /// Symbols whose profile was requested, in call order.
    pub profile_calls: RefCell<Vec<String>>,
}

impl MockMarket {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            profiles: HashMap::new(),
            prices: HashMap::new(),
            profile_errors: Vec::new(),
            listing_error: None,
            profile_calls: RefCell::new(Vec::new()),
        }
    }

    /// A listed stock with an IPO date and a quote.
    pub fn with_stock(mut self, symbol: &str, exchange: &str, ipo: &str, price: f64) -> Self {
        self.symbols.push(symbol.to_string());
        self.profiles.insert(
            symbol.to_string(),
            CompanyProfile::new()
                .with_field("name", &format!("{symbol} Inc"))
                .with_field("exchange", exchange)
                .with_field("ipo", ipo)
                .with_field("finnhubIndustry", "Technology"),
        );
        self.prices.insert(symbol.to_string(), price);
        self
    }

    /// A listed symbol whose profile lookup fails.
    pub fn with_failing_profile(mut self, symbol: &str) -> Self {
        self.symbols.push(symbol.to_string());
        self.profile_errors.push(symbol.to_string());
        self
    }

    pub fn with_listing_error(mut self, reason: &str) -> Self {
        self.listing_error = Some(reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarket {
    fn list_symbols(&self, _exchange: &str) -> Result<Vec<CandidateSymbol>, HhhlError> {
        if let Some(reason) = &self.listing_error {
            return Err(HhhlError::Http {
                endpoint: "finnhub symbols".into(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .symbols
            .iter()
            .map(|s| CandidateSymbol {
                symbol: s.clone(),
                description: format!("{s} COMMON STOCK"),
            })
            .collect())
    }

    fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, HhhlError> {
        self.profile_calls.borrow_mut().push(symbol.to_string());
        if self.profile_errors.iter().any(|s| s == symbol) {
            return Err(HhhlError::HttpStatus {
                endpoint: "finnhub profile".into(),
                status: 500,
            });
        }
        Ok(self.profiles.get(symbol).cloned().unwrap_or_default())
    }

    fn current_price(&self, symbol: &str) -> Result<f64, HhhlError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| HhhlError::MissingField {
                symbol: symbol.into(),
                field: "c".into(),
            })
    }
}

/// In-memory company-data provider; unknown symbols have no record.
pub struct MockDetails {
    pub records: HashMap<String, CompanyProfile>,
}

impl MockDetails {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn with_record(mut self, symbol: &str, record: CompanyProfile) -> Self {
        self.records.insert(symbol.to_string(), record);
        self
    }
}

impl CompanyDetailsPort for MockDetails {
    fn company_details(&self, symbol: &str) -> Result<Option<CompanyProfile>, HhhlError> {
        Ok(self.records.get(symbol).cloned())
    }
}

pub struct MockHistory {
    pub series: HashMap<String, PriceSeries>,
}

impl MockHistory {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.symbol.clone(), series);
        self
    }
}

impl HistoryPort for MockHistory {
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, HhhlError> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| HhhlError::NoData {
                symbol: symbol.to_string(),
            })
    }
}

/// Returns a fixed payload, or fails for the listed symbols.
pub struct MockChart {
    pub failing: Vec<String>,
}

impl MockChart {
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
        }
    }

    pub fn failing_for(symbol: &str) -> Self {
        Self {
            failing: vec![symbol.to_string()],
        }
    }
}

impl ChartPort for MockChart {
    fn render(
        &self,
        series: &PriceSeries,
        ticker: &str,
        exchange: &str,
    ) -> Result<ChartImage, HhhlError> {
        if self.failing.iter().any(|s| s == ticker) {
            return Err(HhhlError::Chart {
                symbol: ticker.to_string(),
                reason: "backend unavailable".into(),
            });
        }
        Ok(ChartImage {
            media_type: "image/png".into(),
            base64: format!("{exchange}-{ticker}-{}", series.len()),
        })
    }
}

/// `len` bars with constant highs and lows, then `rising` bars that each
/// step up by 1.0.
pub fn series_with_rising_tail(symbol: &str, len: usize, rising: usize) -> PriceSeries {
    let start = date(2020, 1, 1);
    let flat = len.saturating_sub(rising);
    let bars = (0..len)
        .map(|i| {
            let step = if i >= flat { (i - flat + 1) as f64 } else { 0.0 };
            let base = 50.0 + step;
            PriceBar {
                date: start + Duration::days(i as i64),
                open: base,
                high: base + 1.0,
                low: base - 1.0,
                close: base + 0.5,
                volume: 1_000,
            }
        })
        .collect();
    PriceSeries::new(symbol, bars)
}

pub fn flat_series(symbol: &str, len: usize) -> PriceSeries {
    series_with_rising_tail(symbol, len, 0)
}
