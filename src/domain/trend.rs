//! Short-term uptrend detection over the last 30 trading days.
//!
//! Differences are taken across the whole series and only then restricted to
//! the window, so the oldest bar of the window is compared with the bar just
//! before it. A series of exactly 30 bars therefore has 29 usable differences.

use tracing::debug;

use crate::domain::ohlcv::PriceSeries;

pub const TREND_WINDOW: usize = 30;
pub const MIN_HIGHER_HIGHS: usize = 2;
pub const MIN_HIGHER_LOWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendAssessment {
    pub higher_highs: usize,
    pub higher_lows: usize,
    /// Number of bars the counts were taken over; 0 when the series was too short.
    pub window: usize,
    pub is_uptrend: bool,
}

impl TrendAssessment {
    fn insufficient() -> Self {
        Self {
            higher_highs: 0,
            higher_lows: 0,
            window: 0,
            is_uptrend: false,
        }
    }
}

pub fn assess_trend(series: &PriceSeries) -> TrendAssessment {
    if series.len() < TREND_WINDOW {
        debug!(
            symbol = %series.symbol,
            bars = series.len(),
            "insufficient data for uptrend analysis"
        );
        return TrendAssessment::insufficient();
    }

    let higher_highs = count_positive_tail(&series.high_diffs());
    let higher_lows = count_positive_tail(&series.low_diffs());
    let is_uptrend = higher_highs >= MIN_HIGHER_HIGHS && higher_lows >= MIN_HIGHER_LOWS;

    debug!(
        symbol = %series.symbol,
        higher_highs,
        higher_lows,
        is_uptrend,
        "trend over last {TREND_WINDOW} bars"
    );

    TrendAssessment {
        higher_highs,
        higher_lows,
        window: TREND_WINDOW,
        is_uptrend,
    }
}

pub fn is_uptrend(series: &PriceSeries) -> bool {
    assess_trend(series).is_uptrend
}

fn count_positive_tail(diffs: &[Option<f64>]) -> usize {
    let start = diffs.len().saturating_sub(TREND_WINDOW);
    diffs[start..]
        .iter()
        .filter(|d| matches!(d, Some(v) if *v > 0.0))
        .count()
}
