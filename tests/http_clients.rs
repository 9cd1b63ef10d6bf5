//! Integration tests for the geocoder and dataset clients
//!
//! Uses wiremock for HTTP mocking. Covers request shape, success parsing and
//! the mapping of HTTP failures onto error variants.

mod common;

use civiclookup::data::{
    CivicClient, CongressClient, DatasetSource, DivisionId, FetchError, GeocodeError, Geocoder,
    Jurisdiction, LegislatorField, Role,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{mount_dataset, mount_divisions, API_KEY, NO_DIVISIONS, OAKLAND_DIVISIONS};

fn civic_client(mock_server: &MockServer) -> CivicClient {
    CivicClient::new(API_KEY).with_base_url(mock_server.uri())
}

fn congress_client(mock_server: &MockServer) -> CongressClient {
    CongressClient::new().with_base_url(mock_server.uri())
}

#[tokio::test]
async fn test_divisions_sends_address_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/divisionsByAddress"))
        .and(query_param("address", "1 Frank H Ogawa Plaza, Oakland, CA, USA"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_string(OAKLAND_DIVISIONS))
        .expect(1)
        .mount(&mock_server)
        .await;

    let divisions = civic_client(&mock_server)
        .divisions("1 Frank H Ogawa Plaza, Oakland, CA, USA")
        .await
        .expect("geocode failed");

    assert_eq!(divisions.len(), 4);
    assert!(divisions.contains(&DivisionId::us_state("ca").child("cd", "12")));
}

#[tokio::test]
async fn test_divisions_empty_response() {
    let mock_server = MockServer::start().await;
    mount_divisions(&mock_server, NO_DIVISIONS).await;

    let divisions = civic_client(&mock_server)
        .divisions("nowhere")
        .await
        .expect("geocode failed");

    assert!(divisions.is_empty());
}

#[tokio::test]
async fn test_divisions_403_is_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/divisionsByAddress"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"error": {"code": 403, "message": "API key not valid. Please pass a valid API key."}}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = civic_client(&mock_server)
        .divisions("anywhere")
        .await
        .expect_err("expected failure");

    match err {
        GeocodeError::InvalidApiKey { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected InvalidApiKey, got {:?}", other),
    }
}

#[tokio::test]
async fn test_divisions_400_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/divisionsByAddress"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error": {"code": 400, "message": "Failed to parse address"}}"#,
        ))
        .mount(&mock_server)
        .await;

    let err = civic_client(&mock_server)
        .divisions("???")
        .await
        .expect_err("expected failure");

    assert!(
        matches!(err, GeocodeError::Api { status: 400, ref message } if message == "Failed to parse address")
    );
}

#[tokio::test]
async fn test_divisions_garbage_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    mount_divisions(&mock_server, "<html>not json</html>").await;

    let err = civic_client(&mock_server).divisions("addr").await.unwrap_err();
    assert!(matches!(err, GeocodeError::ParseError(_)));
}

#[tokio::test]
async fn test_fetch_roster_joins_social_accounts() {
    let mock_server = MockServer::start().await;
    mount_dataset(&mock_server, 1).await;

    let legislators = congress_client(&mock_server)
        .fetch_roster(Jurisdiction::Us)
        .await
        .expect("fetch failed");

    let ids: Vec<_> = legislators.iter().map(|l| l.bioguide_id.as_str()).collect();
    assert_eq!(ids, vec!["N000147", "P000145", "S001150", "S001231"]);

    let padilla = &legislators[1];
    assert_eq!(padilla.role, Role::Senator);
    assert_eq!(
        padilla.field_value(LegislatorField::Twitter),
        Some(serde_json::Value::from("SenAlexPadilla"))
    );

    // Schiff's latest term is in the Senate
    let schiff = &legislators[2];
    assert_eq!(schiff.role, Role::Senator);
    assert_eq!(schiff.district, None);
}

#[tokio::test]
async fn test_fetch_roster_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/legislators-current.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = congress_client(&mock_server)
        .fetch_roster(Jurisdiction::Us)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_roster_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/legislators-current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&mock_server)
        .await;

    let err = congress_client(&mock_server)
        .fetch_roster(Jurisdiction::Us)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ParseError { .. }));
}

#[tokio::test]
async fn test_fetch_roster_empty_dataset() {
    let mock_server = MockServer::start().await;

    for file in ["/legislators-current.json", "/legislators-social-media.json"] {
        Mock::given(method("GET"))
            .and(path(file))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;
    }

    let err = congress_client(&mock_server)
        .fetch_roster(Jurisdiction::Us)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Empty(Jurisdiction::Us)));
}
