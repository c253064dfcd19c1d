//! Financial Modeling Prep adapter for extended company details.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::adapters::http::{build_client, get_json, join_url};
use crate::domain::error::HhhlError;
use crate::domain::profile::CompanyProfile;
use crate::ports::market_data_port::CompanyDetailsPort;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

pub struct FmpAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FmpAdapter {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, HhhlError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }
}

impl CompanyDetailsPort for FmpAdapter {
    fn company_details(&self, symbol: &str) -> Result<Option<CompanyProfile>, HhhlError> {
        let body = get_json(
            &self.client,
            "fmp profile",
            &join_url(&self.base_url, &format!("profile/{symbol}")),
            &[],
            Some(("apikey", self.api_key.as_str())),
        )?;
        parse_details(&body)
    }
}

/// The profile endpoint answers with a list holding at most one record.
pub fn parse_details(body: &Value) -> Result<Option<CompanyProfile>, HhhlError> {
    let records = body.as_array().ok_or_else(|| HhhlError::Decode {
        endpoint: "fmp profile".into(),
        reason: "expected a list of company records".into(),
    })?;
    match records.first() {
        None => Ok(None),
        Some(record) => CompanyProfile::from_json(record)
            .map(Some)
            .ok_or_else(|| HhhlError::Decode {
                endpoint: "fmp profile".into(),
                reason: "company record is not an object".into(),
            }),
    }
}
