use super::*;
use crate::util::storage::{ACCESS_TOKEN_KEY, MemoryStorage};
use serde_json::json;

#[test]
fn character_path_formats_expected_path() {
    assert_eq!(character_path(42), "/api/characters/42");
}

#[test]
fn extract_detail_reads_string_detail() {
    assert_eq!(
        extract_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(),
        Some("Invalid credentials")
    );
}

#[test]
fn extract_detail_keeps_surrounding_whitespace() {
    assert_eq!(
        extract_detail(r#"{"detail":" Username already taken\n"}"#).as_deref(),
        Some(" Username already taken\n")
    );
}

#[test]
fn extract_detail_ignores_missing_blank_and_structured_detail() {
    assert_eq!(extract_detail(r#"{"message":"nope"}"#), None);
    assert_eq!(extract_detail(r#"{"detail":"  "}"#), None);
    assert_eq!(extract_detail(r#"{"detail":[{"loc":["body","name"],"msg":"field required"}]}"#), None);
    assert_eq!(extract_detail("<html>502 Bad Gateway</html>"), None);
    assert_eq!(extract_detail(""), None);
}

#[test]
fn user_message_prefers_detail_then_fallback() {
    let with_detail = ApiError::Status { status: 401, detail: Some("Invalid credentials".to_owned()) };
    assert_eq!(with_detail.user_message("Login failed"), "Invalid credentials");

    let bare = ApiError::Status { status: 500, detail: None };
    assert_eq!(bare.user_message("Login failed"), "Login failed");
    assert_eq!(ApiError::Transport("offline".to_owned()).user_message("Login failed"), "Login failed");
    assert_eq!(ApiError::Timeout(10).user_message("Login failed"), "Login failed");
}

#[test]
fn status_only_reported_for_http_errors() {
    assert_eq!(ApiError::Status { status: 404, detail: None }.status(), Some(404));
    assert_eq!(ApiError::Decode("bad".to_owned()).status(), None);
}

#[test]
fn parse_response_maps_error_status_with_detail() {
    assert_eq!(
        parse_response(400, false, r#"{"detail":"Username already registered"}"#),
        Err(ApiError::Status { status: 400, detail: Some("Username already registered".to_owned()) })
    );
}

#[test]
fn parse_response_empty_success_body_is_null() {
    assert_eq!(parse_response(204, true, ""), Ok(serde_json::Value::Null));
}

#[test]
fn parse_response_rejects_malformed_success_body() {
    assert!(matches!(parse_response(200, true, "{oops"), Err(ApiError::Decode(_))));
}

#[test]
fn parse_response_returns_json_body() {
    assert_eq!(parse_response(200, true, r#"[{"id":1}]"#), Ok(json!([{ "id": 1 }])));
}

#[test]
fn form_body_keeps_field_order() {
    assert_eq!(
        RequestBody::form(&[("username", "alice"), ("password", "pw")]),
        RequestBody::Form(vec![
            ("username".to_owned(), "alice".to_owned()),
            ("password".to_owned(), "pw".to_owned()),
        ])
    );
}

#[test]
fn decode_reports_schema_mismatch() {
    let result = decode::<Vec<i64>>(json!({ "not": "a list" }));
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[test]
fn http_client_builds_urls_and_bearer_from_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let config = ClientConfig::from_values(Some("https://api.example.com/"), None, None, None);
    let client = HttpApiClient::new(&config, Arc::clone(&storage));

    assert_eq!(client.url(LOGIN_PATH), "https://api.example.com/api/auth/login");
    assert_eq!(client.authorization(), None);

    storage.set(ACCESS_TOKEN_KEY, "T1").unwrap();
    assert_eq!(client.authorization().as_deref(), Some("Bearer T1"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn http_client_is_unavailable_off_browser() {
    let client = HttpApiClient::new(&ClientConfig::default(), Arc::new(MemoryStorage::new()));
    let result = futures::executor::block_on(client.get(CHARACTERS_PATH));
    assert_eq!(result, Err(ApiError::Unavailable));
}
