//! Price history port trait.

use crate::domain::error::HhhlError;
use crate::domain::ohlcv::PriceSeries;

pub trait HistoryPort {
    /// Maximum available daily history for `symbol`.
    fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, HhhlError>;
}
