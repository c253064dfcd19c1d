//! Shared blocking HTTP plumbing for the provider adapters.
//!
//! One request per call, no retries. Query parameters that carry credentials
//! are passed separately so they never appear in logs.

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::domain::error::HhhlError;

const USER_AGENT: &str = concat!("hhhl/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<Client, HhhlError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| HhhlError::Http {
            endpoint: "client".into(),
            reason: e.to_string(),
        })
}

/// GETs `url` and parses the body as JSON.
///
/// `endpoint` names the call in errors and logs; `secret` is appended to the
/// query but kept out of both.
pub fn get_json(
    client: &Client,
    endpoint: &str,
    url: &str,
    query: &[(&str, &str)],
    secret: Option<(&str, &str)>,
) -> Result<Value, HhhlError> {
    debug!(endpoint, url, ?query, "GET");

    let mut request = client.get(url).query(query);
    if let Some(param) = secret {
        request = request.query(&[param]);
    }

    let response = request.send().map_err(|e| HhhlError::Http {
        endpoint: endpoint.to_string(),
        reason: e.without_url().to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HhhlError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(|e| HhhlError::Http {
        endpoint: endpoint.to_string(),
        reason: e.without_url().to_string(),
    })?;
    parse_json(endpoint, &body)
}

pub fn parse_json(endpoint: &str, body: &str) -> Result<Value, HhhlError> {
    serde_json::from_str(body).map_err(|e| HhhlError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Joins a configured base URL and a path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
