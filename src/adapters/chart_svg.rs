//! SVG close-price chart, base64-encoded for embedding in the report.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::error::HhhlError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::report::ChartImage;
use crate::ports::chart_port::ChartPort;

pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 500.0;
const PAD_LEFT: f64 = 70.0;
const PAD_RIGHT: f64 = 30.0;
const PAD_TOP: f64 = 50.0;
const PAD_BOTTOM: f64 = 60.0;
const LINE_COLOR: &str = "#1f77b4";

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        series: &PriceSeries,
        ticker: &str,
        exchange: &str,
    ) -> Result<ChartImage, HhhlError> {
        let svg = generate_close_svg(series, ticker, exchange).ok_or_else(|| HhhlError::Chart {
            symbol: ticker.to_string(),
            reason: "no finite close prices to plot".into(),
        })?;
        Ok(ChartImage {
            media_type: SVG_MEDIA_TYPE.to_string(),
            base64: STANDARD.encode(svg.as_bytes()),
        })
    }
}

/// Line chart of close prices over the whole series. `None` when nothing is plottable.
pub fn generate_close_svg(series: &PriceSeries, ticker: &str, exchange: &str) -> Option<String> {
    let closes = series.closes();
    if closes.is_empty() || closes.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if closes.len() > 1 {
        plot_width / (closes.len() - 1) as f64
    } else {
        0.0
    };
    let bottom = HEIGHT - PAD_BOTTOM;

    let points: Vec<String> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let x = PAD_LEFT + i as f64 * scale_x;
            let y = if range > 0.0 {
                bottom - (close - min) * scale_y
            } else {
                PAD_TOP + plot_height / 2.0
            };
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    let first_date = series
        .first_date()
        .map(|d| d.to_string())
        .unwrap_or_default();
    let last_date = series
        .last_date()
        .map(|d| d.to_string())
        .unwrap_or_default();
    let title = html_escape::encode_text(&format!("{exchange}_{ticker} Stock Price")).into_owned();

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="Arial, sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push_str(r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="30" text-anchor="middle" font-size="18">{}</text>"#,
        WIDTH / 2.0,
        title
    ));
    // axes
    svg.push_str(&format!(
        r##"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="#333"/><line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="#333"/>"##,
        l = PAD_LEFT,
        t = PAD_TOP,
        b = bottom,
        r = WIDTH - PAD_RIGHT
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
        PAD_LEFT - 6.0,
        PAD_TOP + 4.0,
        max
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{:.2}</text>"#,
        PAD_LEFT - 6.0,
        bottom,
        min
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
        PAD_LEFT,
        bottom + 18.0,
        first_date
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
        WIDTH - PAD_RIGHT,
        bottom + 18.0,
        last_date
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="14">Date</text>"#,
        PAD_LEFT + plot_width / 2.0,
        HEIGHT - 12.0
    ));
    svg.push_str(&format!(
        r#"<text x="18" y="{y:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 18 {y:.1})">Price</text>"#,
        y = PAD_TOP + plot_height / 2.0
    ));
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
        LINE_COLOR,
        points.join(" ")
    ));
    // legend
    svg.push_str(&format!(
        r#"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{c}" stroke-width="2"/><text x="{tx:.1}" y="{ty:.1}" font-size="12">Close Price</text>"#,
        x1 = PAD_LEFT + 12.0,
        x2 = PAD_LEFT + 36.0,
        y = PAD_TOP + 14.0,
        c = LINE_COLOR,
        tx = PAD_LEFT + 42.0,
        ty = PAD_TOP + 18.0
    ));
    svg.push_str("</svg>");

    Some(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
            })
            .collect();
        PriceSeries::new("ACME", bars)
    }

    #[test]
    fn empty_series_yields_no_svg() {
        assert!(generate_close_svg(&series(&[]), "ACME", "NASDAQ").is_none());
    }

    #[test]
    fn svg_has_title_axes_and_legend() {
        let svg = generate_close_svg(&series(&[10.0, 12.0, 11.0]), "ACME", "NASDAQ").unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("NASDAQ_ACME Stock Price"));
        assert!(svg.contains(">Date<"));
        assert!(svg.contains(">Price<"));
        assert!(svg.contains("Close Price"));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-03"));
        assert!(svg.contains("12.00"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn polyline_spans_plot_area() {
        let svg = generate_close_svg(&series(&[10.0, 20.0]), "ACME", "NYSE").unwrap();
        // lowest close at the bottom-left, highest at the top-right
        assert!(svg.contains("70.0,440.0 970.0,50.0"));
    }

    #[test]
    fn flat_series_is_drawn_mid_height() {
        let svg = generate_close_svg(&series(&[5.0, 5.0]), "ACME", "NYSE").unwrap();
        assert!(svg.contains("70.0,245.0 970.0,245.0"));
    }

    #[test]
    fn render_encodes_svg_as_base64() {
        let chart = SvgChartAdapter::new()
            .render(&series(&[1.0, 2.0, 3.0]), "ACME", "NYSE")
            .unwrap();
        assert_eq!(chart.media_type, SVG_MEDIA_TYPE);
        let decoded = STANDARD.decode(&chart.base64).unwrap();
        assert!(String::from_utf8(decoded).unwrap().contains("NYSE_ACME"));
        assert!(chart.data_url().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn render_empty_series_is_chart_error() {
        let err = SvgChartAdapter::new()
            .render(&series(&[]), "ACME", "NYSE")
            .unwrap_err();
        assert!(matches!(err, HhhlError::Chart { .. }));
    }
}
