//! Finnhub exchange-data adapter: symbol listing, company profile, quote.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::http::{build_client, get_json, join_url};
use crate::domain::error::HhhlError;
use crate::domain::profile::CompanyProfile;
use crate::ports::market_data_port::{CandidateSymbol, MarketDataPort};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

pub struct FinnhubAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SymbolRecord {
    symbol: String,
    #[serde(default)]
    description: Option<String>,
}

impl FinnhubAdapter {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, HhhlError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }

    fn get(&self, endpoint: &str, path: &str, query: &[(&str, &str)]) -> Result<Value, HhhlError> {
        get_json(
            &self.client,
            endpoint,
            &join_url(&self.base_url, path),
            query,
            Some(("token", self.api_key.as_str())),
        )
    }
}

impl MarketDataPort for FinnhubAdapter {
    fn list_symbols(&self, exchange: &str) -> Result<Vec<CandidateSymbol>, HhhlError> {
        let body = self.get(
            "finnhub symbol listing",
            "stock/symbol",
            &[("exchange", exchange)],
        )?;
        parse_symbols(body)
    }

    fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, HhhlError> {
        let body = self.get("finnhub profile", "stock/profile2", &[("symbol", symbol)])?;
        parse_profile(&body)
    }

    fn current_price(&self, symbol: &str) -> Result<f64, HhhlError> {
        let body = self.get("finnhub quote", "quote", &[("symbol", symbol)])?;
        parse_quote(symbol, &body)
    }
}

pub fn parse_symbols(body: Value) -> Result<Vec<CandidateSymbol>, HhhlError> {
    let records: Vec<SymbolRecord> =
        serde_json::from_value(body).map_err(|e| HhhlError::Decode {
            endpoint: "finnhub symbol listing".into(),
            reason: format!("expected a list of symbols: {e}"),
        })?;
    Ok(records
        .into_iter()
        .map(|r| CandidateSymbol {
            symbol: r.symbol,
            description: r.description.unwrap_or_default(),
        })
        .collect())
}

/// `null` and `{}` both mean "unknown symbol" and yield an empty profile.
pub fn parse_profile(body: &Value) -> Result<CompanyProfile, HhhlError> {
    if body.is_null() {
        return Ok(CompanyProfile::new());
    }
    CompanyProfile::from_json(body).ok_or_else(|| HhhlError::Decode {
        endpoint: "finnhub profile".into(),
        reason: "expected a JSON object".into(),
    })
}

pub fn parse_quote(symbol: &str, body: &Value) -> Result<f64, HhhlError> {
    body.get("c")
        .and_then(Value::as_f64)
        .ok_or_else(|| HhhlError::MissingField {
            symbol: symbol.to_string(),
            field: "c".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_symbols_reads_symbol_and_description() {
        let body = json!([
            {"currency": "USD", "description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"},
            {"symbol": "XYZ"}
        ]);
        let symbols = parse_symbols(body).unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].symbol, "AAPL");
        assert_eq!(symbols[0].description, "APPLE INC");
        assert_eq!(symbols[1].description, "");
    }

    #[test]
    fn parse_symbols_rejects_non_list() {
        let err = parse_symbols(json!({"error": "Invalid API key"})).unwrap_err();
        assert!(matches!(err, HhhlError::Decode { .. }));
    }

    #[test]
    fn parse_profile_reads_fields() {
        let body = json!({
            "country": "US",
            "exchange": "NASDAQ NMS - GLOBAL MARKET",
            "finnhubIndustry": "Technology",
            "ipo": "1980-12-12",
            "name": "Apple Inc",
            "weburl": "https://www.apple.com/"
        });
        let profile = parse_profile(&body).unwrap();
        assert_eq!(profile.get("ipo"), Some("1980-12-12"));
        assert_eq!(profile.sector(), Some("Technology"));
        assert_eq!(profile.exchange(), Some("NASDAQ NMS - GLOBAL MARKET"));
    }

    #[test]
    fn parse_profile_empty_object_is_empty() {
        assert!(parse_profile(&json!({})).unwrap().is_empty());
        assert!(parse_profile(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn parse_profile_rejects_list() {
        assert!(parse_profile(&json!([1, 2])).is_err());
    }

    #[test]
    fn parse_quote_reads_current_price() {
        let body = json!({"c": 80.25, "d": 1.1, "dp": 1.3, "h": 81.0, "l": 79.0, "o": 79.5, "pc": 79.15});
        assert_eq!(parse_quote("ACME", &body).unwrap(), 80.25);
    }

    #[test]
    fn parse_quote_keeps_zero() {
        assert_eq!(parse_quote("ACME", &json!({"c": 0})).unwrap(), 0.0);
    }

    #[test]
    fn parse_quote_missing_field() {
        let err = parse_quote("ACME", &json!({"error": "limit"})).unwrap_err();
        assert!(matches!(err, HhhlError::MissingField { ref field, .. } if field == "c"));
    }
}
