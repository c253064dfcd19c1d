//! hhhl: scans an exchange for cheap, recently listed stocks making higher
//! highs and higher lows, and writes an HTML report with their charts.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
