//! Concrete adapter implementations for ports.

pub mod browser;
pub mod chart_svg;
pub mod csv_history_adapter;
pub mod file_config_adapter;
pub mod finnhub_adapter;
pub mod fmp_adapter;
pub mod html_report;
pub mod http;
pub mod yahoo_history_adapter;
