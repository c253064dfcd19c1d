//! Daily price bars and the per-symbol price series.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Full daily history for one symbol, ordered by date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, sorting the bars by date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// high[i] - high[i-1]; `None` for the first bar.
    pub fn high_diffs(&self) -> Vec<Option<f64>> {
        diffs(self.bars.iter().map(|b| b.high))
    }

    /// low[i] - low[i-1]; `None` for the first bar.
    pub fn low_diffs(&self) -> Vec<Option<f64>> {
        diffs(self.bars.iter().map(|b| b.low))
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

fn diffs(values: impl Iterator<Item = f64>) -> Vec<Option<f64>> {
    let mut prev: Option<f64> = None;
    values
        .map(|v| {
            let d = prev.map(|p| v - p);
            prev = Some(v);
            d
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, high: f64, low: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: low,
            high,
            low,
            close: (high + low) / 2.0,
            volume: 1_000,
        }
    }

    #[test]
    fn new_sorts_by_date() {
        let series = PriceSeries::new(
            "ABC",
            vec![
                bar("2024-01-03", 12.0, 10.0),
                bar("2024-01-01", 10.0, 8.0),
                bar("2024-01-02", 11.0, 9.0),
            ],
        );
        assert_eq!(
            series.first_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn first_diff_is_none() {
        let series = PriceSeries::new(
            "ABC",
            vec![bar("2024-01-01", 10.0, 8.0), bar("2024-01-02", 9.0, 8.5)],
        );
        assert_eq!(series.high_diffs(), vec![None, Some(-1.0)]);
        assert_eq!(series.low_diffs(), vec![None, Some(0.5)]);
    }

    #[test]
    fn diffs_of_empty_series() {
        let series = PriceSeries::new("ABC", Vec::new());
        assert!(series.is_empty());
        assert!(series.high_diffs().is_empty());
        assert!(series.low_diffs().is_empty());
    }

    #[test]
    fn closes_follow_date_order() {
        let series = PriceSeries::new(
            "ABC",
            vec![bar("2024-01-02", 12.0, 10.0), bar("2024-01-01", 10.0, 8.0)],
        );
        assert_eq!(series.closes(), vec![9.0, 11.0]);
    }
}
