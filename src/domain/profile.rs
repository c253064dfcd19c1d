//! Company profile merged from the exchange-data and company-data providers.
//!
//! Both providers answer with flat JSON objects. Fields are kept by their
//! provider key so nothing is lost in the merge; the accessors know which
//! key each provider uses for the same concept.

use std::collections::BTreeMap;

use serde_json::Value;

/// Placeholder for profile fields that neither provider supplied.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    fields: BTreeMap<String, String>,
}

impl CompanyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from a JSON object. Scalars are stored as text and
    /// `null` fields are dropped. Returns `None` for anything but an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let fields = object
            .iter()
            .filter_map(|(key, v)| scalar_text(v).map(|text| (key.clone(), text)))
            .collect();
        Some(Self { fields })
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Merges two provider profiles. Values from `secondary` replace those of
    /// `primary` on key collision; every other key of both is kept.
    pub fn merge(primary: &CompanyProfile, secondary: &CompanyProfile) -> CompanyProfile {
        let mut fields = primary.fields.clone();
        for (key, value) in &secondary.fields {
            fields.insert(key.clone(), value.clone());
        }
        CompanyProfile { fields }
    }

    fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn company_name(&self) -> Option<&str> {
        self.first_of(&["companyName", "name"])
    }

    pub fn sector(&self) -> Option<&str> {
        self.first_of(&["sector", "finnhubIndustry"])
    }

    pub fn ipo_date(&self) -> Option<&str> {
        self.first_of(&["ipoDate", "ipo"])
    }

    pub fn website(&self) -> Option<&str> {
        self.first_of(&["website", "weburl"]).filter(|w| !w.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn exchange(&self) -> Option<&str> {
        self.get("exchange")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_scalars_and_drops_nulls() {
        let profile = CompanyProfile::from_json(&json!({
            "name": "Acme Corp",
            "ipo": "2015-06-01",
            "marketCapitalization": 1234.5,
            "isEtf": false,
            "logo": null
        }))
        .unwrap();

        assert_eq!(profile.get("name"), Some("Acme Corp"));
        assert_eq!(profile.get("marketCapitalization"), Some("1234.5"));
        assert_eq!(profile.get("isEtf"), Some("false"));
        assert_eq!(profile.get("logo"), None);
        assert_eq!(profile.len(), 4);
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(CompanyProfile::from_json(&json!([])).is_none());
        assert!(CompanyProfile::from_json(&json!("x")).is_none());
    }

    #[test]
    fn empty_object_is_empty_profile() {
        let profile = CompanyProfile::from_json(&json!({})).unwrap();
        assert!(profile.is_empty());
    }

    #[test]
    fn merge_secondary_wins_on_collision() {
        let primary = CompanyProfile::new()
            .with_field("exchange", "NASDAQ NMS - GLOBAL MARKET")
            .with_field("ipo", "2015-06-01");
        let secondary = CompanyProfile::new()
            .with_field("exchange", "NASDAQ")
            .with_field("companyName", "Acme Corp");

        let merged = CompanyProfile::merge(&primary, &secondary);

        assert_eq!(merged.get("exchange"), Some("NASDAQ"));
        assert_eq!(merged.get("ipo"), Some("2015-06-01"));
        assert_eq!(merged.get("companyName"), Some("Acme Corp"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_with_empty_secondary_is_primary() {
        let primary = CompanyProfile::new().with_field("ipo", "2015-06-01");
        let merged = CompanyProfile::merge(&primary, &CompanyProfile::new());
        assert_eq!(merged, primary);
    }

    #[test]
    fn accessors_prefer_secondary_keys() {
        let profile = CompanyProfile::new()
            .with_field("name", "Acme")
            .with_field("companyName", "Acme Corporation")
            .with_field("finnhubIndustry", "Technology")
            .with_field("weburl", "https://acme.example");

        assert_eq!(profile.company_name(), Some("Acme Corporation"));
        assert_eq!(profile.sector(), Some("Technology"));
        assert_eq!(profile.website(), Some("https://acme.example"));
        assert_eq!(profile.description(), None);
    }

    #[test]
    fn empty_website_is_absent() {
        let profile = CompanyProfile::new().with_field("weburl", "");
        assert_eq!(profile.website(), None);
    }
}
