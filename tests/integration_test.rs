// Integration tests for the CASE client
//
// These tests run the full stack (credential file, token grant, bearer check,
// paginated CFDocuments retrieval, grouping) against a mock registry.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::io::Write;

use case_client::{
    auth::Credentials,
    config::Config,
    report, CaseClient, CaseError,
};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

const FIXTURE_BASIC_AUTH: &str = "Basic Zml4dHVyZS1jbGllbnQ6Zml4dHVyZS1zZWNyZXQ=";

fn test_config(server: &ServerGuard) -> Config {
    Config {
        api_base_url: server.url(),
        oauth_base_url: server.url(),
        credentials_path: "/nonexistent/casenetwork.json".into(),
        http_request_timeout: 10,
        ..Config::default()
    }
}

fn fixture_credentials() -> Option<Credentials> {
    Some(Credentials::new("fixture-client", "fixture-secret"))
}

fn mock_auth(server: &mut ServerGuard) -> (Mock, Mock) {
    let token = server
        .mock("POST", "/clienttoken")
        .match_header("authorization", FIXTURE_BASIC_AUTH)
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "client_credentials".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"fixture-token","token_type":"bearer","expires_in":3600}"#)
        .expect(1)
        .create();
    let check = server
        .mock("GET", "/bearercheck")
        .match_query(Matcher::UrlEncoded("token".into(), "fixture-token".into()))
        .with_status(200)
        .create();
    (token, check)
}

fn document(n: usize) -> Value {
    json!({
        "identifier": format!("doc-{:04}", n),
        "title": format!("Framework {}", n),
        "creator": if n % 2 == 0 { "Even Board" } else { "Odd Board" },
        "adoptionStatus": "Adopted",
    })
}

fn page_body(start: usize, size: usize) -> String {
    let docs: Vec<Value> = (start..start + size).map(document).collect();
    json!({ "CFDocuments": docs }).to_string()
}

fn mock_page(server: &mut ServerGuard, offset: usize, size: usize, hits: usize) -> Mock {
    server
        .mock("GET", "/CFDocuments")
        .match_header("authorization", "Bearer fixture-token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), offset.to_string()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("sort".into(), "identifier".into()),
            Matcher::UrlEncoded("orderBy".into(), "asc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_body(offset, size))
        .expect(hits)
        .create()
}

fn identifiers(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["identifier"].as_str().unwrap().to_string())
        .collect()
}

// ==================================================================================================
// Authentication
// ==================================================================================================

#[test]
fn test_connect_obtains_token() {
    let mut server = Server::new();
    let (token, check) = mock_auth(&mut server);

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let held = client.http().auth_manager().current_token().unwrap();
    assert_eq!(held.as_str(), "fixture-token");

    token.assert();
    check.assert();
}

#[test]
fn test_connect_reads_credential_file() {
    let mut server = Server::new();
    let (token, _check) = mock_auth(&mut server);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"client_id":"fixture-client","client_secret":"fixture-secret"}"#)
        .unwrap();

    let config = Config {
        credentials_path: file.path().to_path_buf(),
        ..test_config(&server)
    };
    assert!(CaseClient::connect(config, None).is_ok());
    token.assert();
}

#[test]
fn test_connect_without_credentials_is_configuration_error() {
    let server = Server::new();
    let result = CaseClient::connect(test_config(&server), None);
    assert!(matches!(result, Err(CaseError::Configuration(_))));
}

#[test]
fn test_rejected_grant_is_authentication_error() {
    let mut server = Server::new();
    let token = server
        .mock("POST", "/clienttoken")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client"}"#)
        .expect(1)
        .create();

    let result = CaseClient::connect(test_config(&server), fixture_credentials());
    match result {
        Err(CaseError::Authentication { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        Err(other) => panic!("expected Authentication error, got {:?}", other),
        Ok(_) => panic!("expected Authentication error, got a client"),
    }
    token.assert();
}

#[test]
fn test_token_response_without_access_token_is_serialization_error() {
    let mut server = Server::new();
    let _token = server
        .mock("POST", "/clienttoken")
        .with_status(200)
        .with_body(r#"{"token_type":"bearer"}"#)
        .create();

    let result = CaseClient::connect(test_config(&server), fixture_credentials());
    assert!(matches!(result, Err(CaseError::Serialization { .. })));
}

#[test]
fn test_empty_access_token_is_authentication_error() {
    let mut server = Server::new();
    let token = server
        .mock("POST", "/clienttoken")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":""}"#)
        .expect(1)
        .create();

    let result = CaseClient::connect(test_config(&server), fixture_credentials());
    match result {
        Err(CaseError::Authentication { status, body }) => {
            assert_eq!(status, 200);
            assert!(body.contains("access_token"));
        }
        Err(other) => panic!("expected Authentication error, got {:?}", other),
        Ok(_) => panic!("expected Authentication error, got a client"),
    }
    token.assert();
}

#[test]
fn test_invalid_config_rejected_before_any_request() {
    let mut server = Server::new();
    let token = server.mock("POST", "/clienttoken").expect(0).create();

    let config = Config {
        max_pages: 0,
        ..test_config(&server)
    };
    let result = CaseClient::connect(config, fixture_credentials());
    assert!(matches!(result, Err(CaseError::Configuration(_))));
    token.assert();
}

// ==================================================================================================
// Pagination
// ==================================================================================================

#[test]
fn test_documents_stop_at_first_empty_page() {
    let mut server = Server::new();
    let _auth = mock_auth(&mut server);
    let pages = vec![
        mock_page(&mut server, 0, 50, 1),
        mock_page(&mut server, 50, 50, 1),
        mock_page(&mut server, 100, 23, 1),
        mock_page(&mut server, 150, 0, 1),
    ];

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let documents = client.documents().unwrap();

    assert_eq!(documents.len(), 123);
    let expected: Vec<String> = (0..123).map(|n| format!("doc-{:04}", n)).collect();
    assert_eq!(identifiers(&documents), expected);

    for page in pages {
        page.assert();
    }
}

#[test]
fn test_documents_bounded_by_max_pages() {
    let mut server = Server::new();
    let _auth = mock_auth(&mut server);
    let full = server
        .mock("GET", "/CFDocuments")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(200)
        .with_body(page_body(0, 50))
        .expect(10)
        .create();

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let documents = client.documents().unwrap();

    assert_eq!(documents.len(), 500);
    full.assert();
}

#[test]
fn test_documents_idempotent_against_unchanged_data() {
    let mut server = Server::new();
    let _auth = mock_auth(&mut server);
    let _pages = vec![
        mock_page(&mut server, 0, 50, 2),
        mock_page(&mut server, 50, 7, 2),
        mock_page(&mut server, 100, 0, 2),
    ];

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let first = client.documents().unwrap();
    let second = client.documents().unwrap();

    assert_eq!(first.len(), 57);
    assert_eq!(first, second);
}

#[test]
fn test_page_missing_named_array_is_serialization_error() {
    let mut server = Server::new();
    let _auth = mock_auth(&mut server);
    let _page = server
        .mock("GET", "/CFDocuments")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"documents":[]}"#)
        .create();

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let err = client.documents().unwrap_err();
    assert!(matches!(err, CaseError::Serialization { .. }));
}

// ==================================================================================================
// Reporting
// ==================================================================================================

#[test]
fn test_documents_grouped_by_creator() {
    let mut server = Server::new();
    let _auth = mock_auth(&mut server);
    let _pages = vec![
        mock_page(&mut server, 0, 5, 1),
        mock_page(&mut server, 50, 0, 1),
    ];

    let client = CaseClient::connect(test_config(&server), fixture_credentials()).unwrap();
    let documents = client.documents().unwrap();
    let groups = report::group_by_creator(&documents).unwrap();

    let creators: Vec<&str> = groups.iter().map(|g| g.creator.as_str()).collect();
    assert_eq!(creators, vec!["Even Board", "Odd Board"]);
    assert_eq!(groups[0].documents.len(), 3);
    assert_eq!(groups[1].documents.len(), 2);
    assert_eq!(groups[0].documents[0].title, "Framework 0");
}
