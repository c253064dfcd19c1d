//! Configuration validation.
//!
//! Validates config fields before any provider is contacted.

use std::str::FromStr;

use crate::domain::error::HhhlError;
use crate::ports::config_port::ConfigPort;

pub const HISTORY_SOURCES: &[&str] = &["yahoo", "csv"];

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    validate_exchange(config)?;
    validate_symbols_limit(config)?;
    validate_max_price(config)?;
    validate_listing_window(config)?;
    validate_history_source(config)?;
    Ok(())
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    if let Some(exchange) = config.get_string("screen", "exchange") {
        if exchange.trim().is_empty() {
            return Err(HhhlError::invalid(
                "screen",
                "exchange",
                "exchange must not be empty",
            ));
        }
    }
    Ok(())
}

/// Parses `[section] key` when present. Absent keys fall back to defaults
/// elsewhere; present keys must parse.
fn parse_present<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, HhhlError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HhhlError::invalid(section, key, format!("expected {expected}, got {raw:?}"))),
    }
}

fn validate_symbols_limit(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    if let Some(value) = parse_present::<i64>(config, "screen", "symbols_limit", "an integer")? {
        if value < 1 {
            return Err(HhhlError::invalid(
                "screen",
                "symbols_limit",
                "symbols_limit must be at least 1",
            ));
        }
    }
    Ok(())
}

fn validate_max_price(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    if let Some(value) = parse_present::<f64>(config, "screen", "max_price", "a number")? {
        if value <= 0.0 || !value.is_finite() {
            return Err(HhhlError::invalid(
                "screen",
                "max_price",
                "max_price must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_listing_window(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    if let Some(value) =
        parse_present::<i64>(config, "screen", "listing_window_years", "an integer")?
    {
        if !(1..=200).contains(&value) {
            return Err(HhhlError::invalid(
                "screen",
                "listing_window_years",
                "listing_window_years must be between 1 and 200",
            ));
        }
    }
    Ok(())
}

fn validate_history_source(config: &dyn ConfigPort) -> Result<(), HhhlError> {
    let source = config
        .get_string("history", "source")
        .unwrap_or_else(|| "yahoo".to_string())
        .to_lowercase();
    if !HISTORY_SOURCES.contains(&source.as_str()) {
        return Err(HhhlError::invalid(
            "history",
            "source",
            format!("unknown history source {source:?} (expected yahoo or csv)"),
        ));
    }
    if source == "csv" && config.get_string("history", "csv_dir").is_none() {
        return Err(HhhlError::ConfigMissing {
            section: "history".to_string(),
            key: "csv_dir".to_string(),
        });
    }
    Ok(())
}
