//! Shared fixtures for integration tests

#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

pub const ROSTER_JSON: &str = r#"[
    {
        "id": {"bioguide": "P000145", "govtrack": 456790},
        "name": {"first": "Alex", "last": "Padilla", "official_full": "Alex Padilla"},
        "terms": [
            {"type": "sen", "start": "2021-01-20", "end": "2029-01-03", "state": "CA", "class": 3, "state_rank": "junior", "party": "Democrat", "phone": "202-224-3553"}
        ]
    },
    {
        "id": {"bioguide": "S001150", "govtrack": 400361},
        "name": {"first": "Adam", "last": "Schiff", "official_full": "Adam B. Schiff"},
        "terms": [
            {"type": "rep", "start": "2023-01-03", "end": "2025-01-03", "state": "CA", "district": 30, "party": "Democrat"},
            {"type": "sen", "start": "2024-12-09", "end": "2031-01-03", "state": "CA", "class": 1, "state_rank": "senior", "party": "Democrat", "phone": "202-224-3841"}
        ]
    },
    {
        "id": {"bioguide": "S001231"},
        "name": {"first": "Lateefah", "last": "Simon", "official_full": "Lateefah Simon"},
        "terms": [
            {"type": "rep", "start": "2025-01-03", "end": "2027-01-03", "state": "CA", "district": 12, "party": "Democrat", "phone": "202-225-2661"}
        ]
    },
    {
        "id": {"bioguide": "N000147"},
        "name": {"first": "Eleanor", "last": "Norton", "middle": "Holmes", "official_full": "Eleanor Holmes Norton"},
        "terms": [
            {"type": "rep", "start": "2025-01-03", "end": "2027-01-03", "state": "DC", "district": 0, "party": "Democrat"}
        ]
    }
]"#;

pub const SOCIAL_JSON: &str = r#"[
    {"id": {"bioguide": "P000145"}, "social": {"twitter": "SenAlexPadilla"}},
    {"id": {"bioguide": "N000147"}, "social": {"twitter": "EleanorNorton"}}
]"#;

pub const OAKLAND_DIVISIONS: &str = r#"{
    "kind": "civicinfo#divisionsByAddressResponse",
    "normalizedInput": {"line1": "1 Frank H Ogawa Plaza", "city": "Oakland", "state": "CA", "zip": "94612"},
    "divisions": {
        "ocd-division/country:us": {"name": "United States"},
        "ocd-division/country:us/state:ca": {"name": "California"},
        "ocd-division/country:us/state:ca/cd:12": {"name": "California's 12th congressional district"},
        "ocd-division/country:us/state:ca/place:oakland": {"name": "Oakland city"}
    }
}"#;

pub const DC_DIVISIONS: &str = r#"{
    "divisions": {
        "ocd-division/country:us": {"name": "United States"},
        "ocd-division/country:us/district:dc": {"name": "District of Columbia"},
        "ocd-division/country:us/district:dc/ward:2": {"name": "DC Ward 2"}
    }
}"#;

pub const NO_DIVISIONS: &str = r#"{"kind": "civicinfo#divisionsByAddressResponse", "normalizedInput": {}}"#;

/// Serves both dataset files; expects exactly `fetches` downloads of each
pub async fn mount_dataset(server: &MockServer, fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/legislators-current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROSTER_JSON))
        .expect(fetches)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/legislators-social-media.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SOCIAL_JSON))
        .expect(fetches)
        .mount(server)
        .await;
}

/// Answers `divisionsByAddress` with `body` for any address
pub async fn mount_divisions(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/divisionsByAddress"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
