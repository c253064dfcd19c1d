//! Port traits between the domain and the outside world.

pub mod chart_port;
pub mod config_port;
pub mod history_port;
pub mod market_data_port;
pub mod report_port;
