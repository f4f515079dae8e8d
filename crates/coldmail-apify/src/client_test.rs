use super::*;

fn test_client(base_url: &str) -> ApifyClient {
    ApifyClient::with_base_url("test-token", 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_targets_sync_dataset_endpoint() {
    let client = test_client("https://api.apify.com");
    let url = client.build_url("VhxlqQXRwhW8H5hNV").unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.apify.com/v2/acts/VhxlqQXRwhW8H5hNV/run-sync-get-dataset-items?token=test-token"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://localhost:8080/proxy/");
    let url = client.build_url("abc").unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:8080/proxy/v2/acts/abc/run-sync-get-dataset-items?token=test-token"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ApifyClient::with_base_url("t", 30, "not a url");
    assert!(matches!(result, Err(ApifyError::InvalidBaseUrl { .. })));
}

#[test]
fn first_item_unwraps_nested_arrays() {
    let payload = serde_json::json!([[{ "fullName": "Jane" }]]);
    let item = first_item(payload).unwrap();
    assert_eq!(item["fullName"], "Jane");
}

#[test]
fn first_item_of_empty_dataset_is_none() {
    assert!(first_item(serde_json::json!([])).is_none());
    assert!(first_item(serde_json::json!([[]])).is_none());
    assert!(first_item(Value::Null).is_none());
}

#[test]
fn first_item_accepts_bare_object() {
    let item = first_item(serde_json::json!({ "name": "Acme" })).unwrap();
    assert_eq!(item["name"], "Acme");
}

#[test]
fn error_message_prefers_envelope_message() {
    let body = r#"{"error":{"type":"run-failed","message":"Actor run failed"}}"#;
    assert_eq!(
        error_message(StatusCode::BAD_REQUEST, body),
        "Actor run failed"
    );
    assert_eq!(
        error_message(StatusCode::BAD_GATEWAY, "<html>"),
        "provider returned HTTP 502 Bad Gateway"
    );
}

#[test]
fn new_client_uses_configured_defaults() {
    let client = ApifyClient::new("t", 30).unwrap();
    assert_eq!(client.base_url.as_str(), DEFAULT_APIFY_BASE_URL);
    assert_eq!(client.profile_actor, DEFAULT_APIFY_PROFILE_ACTOR);
    assert_eq!(client.company_actor, DEFAULT_APIFY_COMPANY_ACTOR);
}
