//! Ports for the exchange-data provider and the company-data provider.

use crate::domain::error::HhhlError;
use crate::domain::profile::CompanyProfile;

/// A ticker from the exchange listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSymbol {
    pub symbol: String,
    pub description: String,
}

pub trait MarketDataPort {
    /// Listing of every symbol traded on `exchange`, in provider order.
    fn list_symbols(&self, exchange: &str) -> Result<Vec<CandidateSymbol>, HhhlError>;

    /// Primary profile. An unknown symbol yields an empty profile, not an error.
    fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, HhhlError>;

    /// Latest quoted price. `0.0` is returned as-is when the provider reports it.
    fn current_price(&self, symbol: &str) -> Result<f64, HhhlError>;
}

pub trait CompanyDetailsPort {
    /// Extended company record, `None` when the provider has no record.
    fn company_details(&self, symbol: &str) -> Result<Option<CompanyProfile>, HhhlError>;
}
