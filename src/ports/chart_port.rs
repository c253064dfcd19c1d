//! Chart rendering port trait.

use crate::domain::error::HhhlError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::report::ChartImage;

pub trait ChartPort {
    fn render(
        &self,
        series: &PriceSeries,
        ticker: &str,
        exchange: &str,
    ) -> Result<ChartImage, HhhlError>;
}
