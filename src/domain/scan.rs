//! The scan pipeline: screen, fetch history, detect trend, chart, accumulate.
//!
//! Stages run sequentially per symbol and the report accumulator is threaded
//! through by value, so the entry order is the screening admission order.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::domain::error::HhhlError;
use crate::domain::report::{Report, ReportEntry};
use crate::domain::screen::{self, AcceptedStock, ScreenCriteria, ScreenOutcome};
use crate::domain::trend::assess_trend;
use crate::ports::chart_port::ChartPort;
use crate::ports::history_port::HistoryPort;
use crate::ports::market_data_port::{CompanyDetailsPort, MarketDataPort};

/// The collaborators a scan needs.
pub struct ScanPorts<'a> {
    pub market: &'a dyn MarketDataPort,
    pub details: &'a dyn CompanyDetailsPort,
    pub history: &'a dyn HistoryPort,
    pub chart: &'a dyn ChartPort,
}

pub struct ScanSummary {
    pub outcome: ScreenOutcome,
    pub report: Report,
}

pub fn run(
    ports: &ScanPorts,
    criteria: &ScreenCriteria,
    title: &str,
    generated_at: NaiveDateTime,
) -> Result<ScanSummary, HhhlError> {
    let outcome = screen::screen(ports.market, ports.details, criteria)?;
    info!(
        examined = outcome.examined,
        accepted = outcome.accepted.len(),
        skipped = outcome.skipped.len(),
        "screening complete"
    );

    let report = collect_uptrends(
        ports.history,
        ports.chart,
        &outcome.accepted,
        Report::new(title, generated_at),
    )?;
    info!(entries = report.len(), "trend analysis complete");

    Ok(ScanSummary { outcome, report })
}

/// Appends an entry to `report` for every accepted stock in an uptrend.
///
/// History failures skip the stock; a chart rendering failure aborts.
pub fn collect_uptrends(
    history: &dyn HistoryPort,
    chart: &dyn ChartPort,
    accepted: &[AcceptedStock],
    mut report: Report,
) -> Result<Report, HhhlError> {
    for stock in accepted {
        let series = match history.fetch_history(&stock.symbol) {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                warn!(symbol = %stock.symbol, "no data found");
                continue;
            }
            Err(e) => {
                warn!(symbol = %stock.symbol, "no data found ({e})");
                continue;
            }
        };

        let trend = assess_trend(&series);
        if !trend.is_uptrend {
            info!(
                symbol = %stock.symbol,
                bars = series.len(),
                higher_highs = trend.higher_highs,
                higher_lows = trend.higher_lows,
                "not in an uptrend"
            );
            continue;
        }

        let image = chart.render(&series, &stock.symbol, &stock.exchange)?;
        info!(symbol = %stock.symbol, "in an uptrend, added to report");
        report.add(ReportEntry {
            ticker: stock.symbol.clone(),
            exchange: stock.exchange.clone(),
            profile: stock.profile.clone(),
            chart: image,
            price: stock.price,
        })?;
    }

    Ok(report)
}
