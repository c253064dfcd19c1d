//! Report entries and the run's report accumulator.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::error::HhhlError;
use crate::domain::profile::CompanyProfile;

pub const DEFAULT_REPORT_TITLE: &str = "Stock Report";

/// A rendered chart, base64-encoded for embedding as a data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub media_type: String,
    pub base64: String,
}

impl ChartImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64)
    }

    pub fn is_empty(&self) -> bool {
        self.base64.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub ticker: String,
    pub exchange: String,
    pub profile: CompanyProfile,
    pub chart: ChartImage,
    /// Price observed at screening time.
    pub price: f64,
}

/// Entries in processing order; a ticker appears at most once.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub generated_at: NaiveDateTime,
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(title: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            generated_at,
            entries: Vec::new(),
        }
    }

    /// Appends `entry`. Returns `Ok(false)` when the ticker is already present.
    pub fn add(&mut self, entry: ReportEntry) -> Result<bool, HhhlError> {
        if entry.chart.is_empty() {
            return Err(HhhlError::Chart {
                symbol: entry.ticker,
                reason: "encoded chart is empty".into(),
            });
        }
        if self.contains(&entry.ticker) {
            warn!(ticker = %entry.ticker, "ticker already in report, dropping duplicate");
            return Ok(false);
        }
        self.entries.push(entry);
        Ok(true)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries.iter().any(|e| e.ticker == ticker)
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `stock_report_YYYYMMDD_HHMMSS.html`
    pub fn file_name(&self) -> String {
        format!(
            "stock_report_{}.html",
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap()
    }

    fn entry(ticker: &str, base64: &str) -> ReportEntry {
        ReportEntry {
            ticker: ticker.into(),
            exchange: "NASDAQ".into(),
            profile: CompanyProfile::new(),
            chart: ChartImage {
                media_type: "image/svg+xml".into(),
                base64: base64.into(),
            },
            price: 42.0,
        }
    }

    #[test]
    fn data_url_embeds_media_type() {
        let chart = ChartImage {
            media_type: "image/svg+xml".into(),
            base64: "PHN2Zz4=".into(),
        };
        assert_eq!(chart.data_url(), "data:image/svg+xml;base64,PHN2Zz4=");
    }

    #[test]
    fn add_keeps_processing_order() {
        let mut report = Report::new(DEFAULT_REPORT_TITLE, generated_at());
        report.add(entry("ZZZ", "AA==")).unwrap();
        report.add(entry("AAA", "AA==")).unwrap();
        let tickers: Vec<_> = report.entries().iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ZZZ", "AAA"]);
    }

    #[test]
    fn duplicate_ticker_is_dropped() {
        let mut report = Report::new(DEFAULT_REPORT_TITLE, generated_at());
        assert!(report.add(entry("ACME", "AA==")).unwrap());
        assert!(!report.add(entry("ACME", "AA==")).unwrap());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn empty_chart_is_rejected() {
        let mut report = Report::new(DEFAULT_REPORT_TITLE, generated_at());
        let err = report.add(entry("ACME", "")).unwrap_err();
        assert!(matches!(err, HhhlError::Chart { .. }));
        assert!(report.is_empty());
    }

    #[test]
    fn file_name_uses_timestamp() {
        let report = Report::new(DEFAULT_REPORT_TITLE, generated_at());
        assert_eq!(report.file_name(), "stock_report_20240309_070503.html");
    }
}
