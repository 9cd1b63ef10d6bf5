//! Google Civic Information API client
//!
//! Resolves a free-text address to the Open Civic Data division identifiers
//! that contain it, using the `divisionsByAddress` endpoint.

use std::collections::BTreeMap;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::division::{DivisionError, DivisionId};

/// Base URL for the Civic Information API
pub const CIVIC_API_BASE_URL: &str = "https://www.googleapis.com/civicinfo/v2";

/// Errors that can occur while geocoding an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API rejected the key
    #[error("Geocoding API rejected the API key (HTTP {status}): {message}")]
    InvalidApiKey { status: u16, message: String },

    /// Any other non-success response
    #[error("Geocoding API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse geocoding response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A returned division identifier could not be parsed
    #[error("Geocoder returned invalid division '{id}': {source}")]
    InvalidDivision {
        id: String,
        #[source]
        source: DivisionError,
    },

    /// A returned division identifier does not start with a country
    #[error("Geocoder returned division '{id}' without a country segment")]
    MissingCountry { id: String },

    /// Divisions spanned more than one country
    #[error("Geocoder returned divisions in several countries: {}", .countries.join(", "))]
    Ambiguous { countries: Vec<String> },
}

/// Source of division identifiers for an address
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// Division identifiers containing the address; empty when none matched
    async fn divisions(&self, address: &str) -> Result<Vec<DivisionId>, GeocodeError>;
}

/// `divisionsByAddress` response body
#[derive(Debug, Deserialize)]
struct DivisionsResponse {
    #[serde(default)]
    divisions: BTreeMap<String, DivisionInfo>,
}

#[derive(Debug, Deserialize)]
struct DivisionInfo {
    #[allow(dead_code)]
    name: Option<String>,
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the Civic Information API
#[derive(Debug, Clone)]
pub struct CivicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CivicClient {
    /// Creates a client with the default HTTP settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Creates a client with a custom HTTP client (timeouts, proxies)
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: CIVIC_API_BASE_URL.to_string(),
        }
    }

    /// Points the client at another base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn lookup(&self, address: &str) -> Result<Vec<DivisionId>, GeocodeError> {
        let url = format!("{}/divisionsByAddress", self.base_url.trim_end_matches('/'));
        tracing::debug!(address, "querying divisionsByAddress");

        let response = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GeocodeError::InvalidApiKey {
                    status: status.as_u16(),
                    message,
                },
                _ => GeocodeError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        parse_response(&text)
    }
}

impl Geocoder for CivicClient {
    async fn divisions(&self, address: &str) -> Result<Vec<DivisionId>, GeocodeError> {
        self.lookup(address).await
    }
}

/// Parses a `divisionsByAddress` body into division identifiers
fn parse_response(text: &str) -> Result<Vec<DivisionId>, GeocodeError> {
    let response: DivisionsResponse = serde_json::from_str(text)?;
    response
        .divisions
        .into_keys()
        .map(|id| {
            id.parse::<DivisionId>()
                .map_err(|source| GeocodeError::InvalidDivision { id, source })
        })
        .collect()
}

/// Pulls the human-readable message out of an API error body
fn error_message(text: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(text)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALIFORNIA_RESPONSE: &str = r#"{
        "kind": "civicinfo#divisionsByAddressResponse",
        "normalizedInput": {
            "line1": "123 Main St",
            "city": "San Francisco",
            "state": "CA",
            "zip": ""
        },
        "divisions": {
            "ocd-division/country:us": {"name": "United States"},
            "ocd-division/country:us/state:ca": {"name": "California"},
            "ocd-division/country:us/state:ca/cd:12": {
                "name": "California's 12th congressional district"
            }
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let divisions = parse_response(CALIFORNIA_RESPONSE).expect("should parse");
        let ids: Vec<String> = divisions.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "ocd-division/country:us",
                "ocd-division/country:us/state:ca",
                "ocd-division/country:us/state:ca/cd:12",
            ]
        );
    }

    #[test]
    fn test_parse_missing_divisions_is_empty() {
        let divisions = parse_response(r#"{"normalizedInput": {}}"#).expect("should parse");
        assert!(divisions.is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_response("{ invalid json }");
        assert!(matches!(result, Err(GeocodeError::ParseError(_))));
    }

    #[test]
    fn test_parse_invalid_division() {
        let result = parse_response(r#"{"divisions": {"ocd-division/country": {}}}"#);
        match result {
            Err(GeocodeError::InvalidDivision { id, .. }) => {
                assert_eq!(id, "ocd-division/country");
            }
            other => panic!("Expected InvalidDivision, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_from_api_body() {
        let body = r#"{"error": {"code": 400, "message": "Failed to parse address", "errors": []}}"#;
        assert_eq!(error_message(body), "Failed to parse address");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
