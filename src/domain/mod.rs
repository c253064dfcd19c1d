//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod ohlcv;
pub mod profile;
pub mod report;
pub mod scan;
pub mod screen;
pub mod trend;
